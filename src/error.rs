use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// No [Observation](crate::prelude::Observation) with a resolved tower location
    /// remains after filtering: we do not guess a position.
    #[error("insufficient data: no usable observation")]
    InsufficientData,

    /// Frequency must be strictly positive to form any path loss model.
    #[error("invalid parameter: frequency must be positive (got {0} MHz)")]
    InvalidFrequency(f64),

    /// Antenna heights are used in logarithms and must be strictly positive.
    #[error("invalid parameter: antenna height must be positive (got {0} m)")]
    InvalidAntennaHeight(f64),

    /// Log-distance model requires a strictly positive path loss exponent.
    #[error("invalid parameter: path loss exponent must be positive (got {0})")]
    InvalidPathLossExponent(f64),

    /// Channel number does not belong to any supported GSM band.
    #[error("invalid parameter: arfcn {0} does not belong to any gsm band")]
    UnknownChannel(u16),

    /// Model evaluation did not lead to a finite, positive distance.
    #[error("invalid parameter: {0} model diverged (non finite distance)")]
    NonFiniteDistance(&'static str),

    /// Failed to parse a propagation model preset
    #[error("invalid parameter: unknown propagation model")]
    UnknownPropagationModel,

    /// Failed to parse an error metric
    #[error("invalid parameter: unknown error metric")]
    UnknownErrorMetric,

    /// Failed to parse an optimization method
    #[error("invalid parameter: unknown optimization method")]
    UnknownOptimizationMethod,

    /// Failed to parse a tower selection strategy
    #[error("invalid parameter: unknown tower selection")]
    UnknownTowerSelection,

    /// Tower selection requires at least one tower to be kept.
    #[error("invalid parameter: max towers must be at least 1")]
    InvalidMaxTowers,

    /// Objective evaluated to `nan` at the initial guess: inputs are invalid.
    #[error("objective is not finite at initial guess")]
    NonFiniteObjective,
}

impl Error {
    /// Returns true if this [Error] results from an invalid input parameter
    /// (as opposed to a lack of data).
    pub fn is_invalid_parameter(&self) -> bool {
        !matches!(self, Self::InsufficientData)
    }
}
