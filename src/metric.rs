use crate::{error::Error, observation::Measurement, position::Coordinate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [ErrorMetric] scores a candidate position against the estimated
/// distances to each tower. This is the objective the solver minimizes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorMetric {
    /// Mean Error: mean of (geodesic distance - estimated distance).
    /// This one is signed and unbounded below: minimizing it pulls the
    /// candidate as close as possible to every tower, overshoots compensating
    /// undershoots. Not a true mismatch metric.
    ME,
    /// Mean Absolute Error
    #[default]
    MAE,
    /// Mean Squared Error
    MSE,
    /// Root Mean Squared Error
    RMSE,
}

impl std::fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ME => write!(f, "ME"),
            Self::MAE => write!(f, "MAE"),
            Self::MSE => write!(f, "MSE"),
            Self::RMSE => write!(f, "RMSE"),
        }
    }
}

impl std::str::FromStr for ErrorMetric {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "me" => Ok(Self::ME),
            "mae" => Ok(Self::MAE),
            "mse" => Ok(Self::MSE),
            "rmse" => Ok(Self::RMSE),
            _ => Err(Error::UnknownErrorMetric),
        }
    }
}

impl ErrorMetric {
    /// All supported metrics
    pub fn all() -> [Self; 4] {
        [Self::RMSE, Self::MSE, Self::ME, Self::MAE]
    }

    /// Evaluates this metric at the (unconstrained) candidate parameters.
    /// Parameters are first wrapped into a valid [Coordinate].
    pub fn evaluate(&self, latitude: f64, longitude: f64, measurements: &[Measurement]) -> f64 {
        let candidate = Coordinate::wrapped(latitude, longitude);
        self.evaluate_at(&candidate, measurements)
    }

    /// Evaluates this metric at this [Coordinate].
    pub fn evaluate_at(&self, candidate: &Coordinate, measurements: &[Measurement]) -> f64 {
        let n = measurements.len() as f64;

        let residuals = measurements
            .iter()
            .map(|m| candidate.geodesic_distance_km(&m.tower) - m.distance_km);

        match self {
            Self::ME => residuals.sum::<f64>() / n,
            Self::MAE => residuals.map(f64::abs).sum::<f64>() / n,
            Self::MSE => residuals.map(|r| r.powi(2)).sum::<f64>() / n,
            Self::RMSE => (residuals.map(|r| r.powi(2)).sum::<f64>() / n).sqrt(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn measurements() -> Vec<Measurement> {
        vec![
            Measurement::new(Coordinate::new(0.0, 0.0), 2.0),
            Measurement::new(Coordinate::new(0.0, 0.1), 4.0),
        ]
    }

    #[test]
    fn parsing() {
        for metric in ErrorMetric::all() {
            assert_eq!(ErrorMetric::from_str(&metric.to_string()), Ok(metric));
        }
        assert!(ErrorMetric::from_str("mape").is_err());
    }

    #[test]
    fn values_at_tower() {
        // candidate on top of first tower
        let m = measurements();
        let d = Coordinate::new(0.0, 0.0).geodesic_distance_km(&Coordinate::new(0.0, 0.1));
        let r = [0.0 - 2.0, d - 4.0];

        let me = ErrorMetric::ME.evaluate(0.0, 0.0, &m);
        assert!((me - (r[0] + r[1]) / 2.0).abs() < 1e-9);

        let mae = ErrorMetric::MAE.evaluate(0.0, 0.0, &m);
        assert!((mae - (r[0].abs() + r[1].abs()) / 2.0).abs() < 1e-9);

        let mse = ErrorMetric::MSE.evaluate(0.0, 0.0, &m);
        assert!((mse - (r[0].powi(2) + r[1].powi(2)) / 2.0).abs() < 1e-9);

        let rmse = ErrorMetric::RMSE.evaluate(0.0, 0.0, &m);
        assert!((rmse - mse.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn wrapped_parameters() {
        // 180° away on both axes folds back onto the same candidate
        let m = measurements();
        let a = ErrorMetric::MAE.evaluate(0.01, 0.02, &m);
        let b = ErrorMetric::MAE.evaluate(180.01, -179.98, &m);
        assert!((a - b).abs() < 1e-9);
    }
}
