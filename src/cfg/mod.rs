use itertools::iproduct;

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{
    error::Error,
    metric::ErrorMetric,
    optimizer::Method,
    propagation::{PropagationContext, PropagationModel},
};

mod selection;
pub use selection::TowerSelection;

/// Position estimation [Config]uration.
/// [Config::default] is the routine location computation:
/// MAE minimized by Nelder-Mead, Hata small/medium city model.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Config {
    /// [ErrorMetric] minimized by the solver
    #[cfg_attr(feature = "serde", serde(default))]
    pub metric: ErrorMetric,
    /// Optimization [Method]
    #[cfg_attr(feature = "serde", serde(default))]
    pub method: Method,
    /// Received level to distance conversion
    #[cfg_attr(feature = "serde", serde(default))]
    pub propagation: PropagationContext,
    /// Maximal number of towers contributing to one estimate.
    /// All deduplicated towers contribute when not defined.
    /// Set to 1 to only use the strongest (or a random) tower.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_towers: Option<usize>,
    /// [TowerSelection] applied when more than `max_towers` are available
    #[cfg_attr(feature = "serde", serde(default))]
    pub selection: TowerSelection,
}

impl Config {
    /// [Config] used when the position of a sample is (re)computed
    /// authoritatively: mean error minimized by Nelder-Mead.
    pub fn authoritative() -> Self {
        Self::default().with_metric(ErrorMetric::ME)
    }

    /// Copies and returns [Config] with [ErrorMetric]
    pub fn with_metric(&self, metric: ErrorMetric) -> Self {
        let mut s = *self;
        s.metric = metric;
        s
    }

    /// Copies and returns [Config] with optimization [Method]
    pub fn with_method(&self, method: Method) -> Self {
        let mut s = *self;
        s.method = method;
        s
    }

    /// Copies and returns [Config] with [PropagationModel], retaining
    /// other propagation settings.
    pub fn with_model(&self, model: PropagationModel) -> Self {
        let mut s = *self;
        s.propagation.model = model;
        s
    }

    /// Copies and returns [Config] with [PropagationContext]
    pub fn with_propagation(&self, propagation: PropagationContext) -> Self {
        let mut s = *self;
        s.propagation = propagation;
        s
    }

    /// Copies and returns [Config] limited to `max_towers`
    pub fn with_max_towers(&self, max_towers: usize) -> Self {
        let mut s = *self;
        s.max_towers = Some(max_towers);
        s
    }

    /// Copies and returns [Config] with [TowerSelection]
    pub fn with_selection(&self, selection: TowerSelection) -> Self {
        let mut s = *self;
        s.selection = selection;
        s
    }

    /// Verifies this [Config] is usable
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_towers == Some(0) {
            return Err(Error::InvalidMaxTowers);
        }
        if let Some(frequency_mhz) = self.propagation.frequency_mhz {
            self.propagation.model.validate(frequency_mhz)?;
        }
        Ok(())
    }

    /// Human readable label, for example `hata_urban_small-MAE-NELDER_MEAD-3-random`
    pub fn label(&self) -> String {
        let towers = match self.max_towers {
            Some(n) => n.to_string(),
            None => "all".to_string(),
        };
        let method = self.method.to_string().to_uppercase().replace('-', "_");
        match self.selection {
            TowerSelection::Strongest => format!(
                "{}-{}-{}-{}",
                self.propagation.model, self.metric, method, towers
            ),
            TowerSelection::Random { .. } => format!(
                "{}-{}-{}-{}-random",
                self.propagation.model, self.metric, method, towers
            ),
        }
    }

    /// Every combination of propagation model preset, [ErrorMetric],
    /// [Method], tower count (1..=max_towers) and [TowerSelection].
    pub fn combinations(max_towers: usize) -> Vec<Self> {
        iproduct!(
            PropagationModel::presets(),
            ErrorMetric::all(),
            Method::all(),
            1..=max_towers,
            [TowerSelection::Strongest, TowerSelection::random()]
        )
        .map(|(model, metric, method, towers, selection)| Self {
            metric,
            method,
            propagation: PropagationContext::new(model),
            max_towers: Some(towers),
            selection,
        })
        .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::propagation::HataEnvironment;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.metric, ErrorMetric::MAE);
        assert_eq!(cfg.method, Method::NelderMead);
        assert_eq!(
            cfg.propagation.model,
            PropagationModel::hata(HataEnvironment::SmallUrban)
        );
        assert!(cfg.max_towers.is_none());
        assert_eq!(cfg.label(), "hata_urban_small-MAE-NELDER_MEAD-all");

        let cfg = Config::authoritative();
        assert_eq!(cfg.metric, ErrorMetric::ME);
        assert_eq!(cfg.method, Method::NelderMead);
    }

    #[test]
    fn labels() {
        let cfg = Config::default()
            .with_max_towers(3)
            .with_selection(TowerSelection::random());
        assert_eq!(cfg.label(), "hata_urban_small-MAE-NELDER_MEAD-3-random");

        let cfg = Config::default()
            .with_model(PropagationModel::cost231(true))
            .with_metric(ErrorMetric::RMSE)
            .with_method(Method::LBfgsB)
            .with_max_towers(1);
        assert_eq!(cfg.label(), "hata_cost_urban-RMSE-L_BFGS_B-1");
    }

    #[test]
    fn combinations() {
        let all = Config::combinations(7);
        assert_eq!(all.len(), 9 * 4 * 5 * 7 * 2);
        assert!(all.iter().all(|cfg| cfg.validate().is_ok()));
    }

    #[test]
    fn validation() {
        assert_eq!(
            Config::default().with_max_towers(0).validate(),
            Err(Error::InvalidMaxTowers)
        );
        let cfg = Config::default()
            .with_propagation(PropagationContext::default().with_frequency_mhz(-1.0));
        assert_eq!(cfg.validate(), Err(Error::InvalidFrequency(-1.0)));
    }
}
