//! Position solver
use std::sync::Arc;

use log::{debug, error, warn};
use nalgebra::Vector2;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    averager::Averager,
    cache::{canonical_order, CacheStatistics, DistanceKey, LaterationKey, ResultCache},
    cfg::Config,
    constants::RADIUS_FLOOR_KM,
    dedup::deduplicate,
    error::Error,
    metric::ErrorMetric,
    observation::{Measurement, Observation},
    optimizer::{Method, Minimizer},
    position::Coordinate,
    propagation::PropagationContext,
};

/// Estimated position of the mobile device
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PositionEstimate {
    /// Best fit [Coordinate]
    pub coordinate: Coordinate,
    /// Uncertainty radius (km), residual error plus [RADIUS_FLOOR_KM]
    pub radius_km: f64,
    /// False when the optimizer exited without meeting its tolerance:
    /// the best iterate is reported but should be considered low confidence.
    pub converged: bool,
    /// Number of towers that contributed
    pub towers: usize,
}

impl PositionEstimate {
    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }
}

/// [Solver] estimates positions from cell tower [Observation]s.
/// Distance and lateration results are memoized in caches shared
/// by every clone of this [Solver], so one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    distances: Arc<ResultCache<DistanceKey, f64>>,
    positions: Arc<ResultCache<LaterationKey, PositionEstimate>>,
}

impl Solver {
    /// Builds new [Solver] with empty caches
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimated distance (km) to the tower of this [Observation].
    /// The carrier frequency is taken from the [PropagationContext] if defined,
    /// from the [Observation] channel otherwise.
    pub fn estimate_distance(
        &self,
        observation: &Observation,
        context: &PropagationContext,
    ) -> Result<f64, Error> {
        let frequency_mhz = match context.frequency_mhz {
            Some(frequency_mhz) => frequency_mhz,
            None => observation.frequency_mhz()?,
        };
        self.estimate_distance_dbm(observation.dbm(), frequency_mhz, context)
    }

    /// Estimated distance (km) to a transmitter received at this power (dBm),
    /// on this carrier frequency (MHz).
    pub fn estimate_distance_dbm(
        &self,
        dbm: f64,
        frequency_mhz: f64,
        context: &PropagationContext,
    ) -> Result<f64, Error> {
        let key = DistanceKey::new(&context.model, dbm, frequency_mhz, context.tx_power_dbm);
        self.distances
            .get_or_try_insert(key, || context.distance_km(dbm, frequency_mhz))
    }

    /// Estimates the position that best fits these [Measurement]s,
    /// by minimizing [ErrorMetric] with [Method].
    /// A single [Measurement] is returned as is (no optimization).
    pub fn laterate(
        &self,
        measurements: &[Measurement],
        metric: ErrorMetric,
        method: Method,
    ) -> Result<PositionEstimate, Error> {
        match measurements {
            [] => Err(Error::InsufficientData),
            [single] => Ok(PositionEstimate {
                coordinate: single.tower,
                radius_km: single.distance_km.max(RADIUS_FLOOR_KM),
                converged: true,
                towers: 1,
            }),
            _ => {
                let mut sorted = measurements.to_vec();
                canonical_order(&mut sorted);
                let key = LaterationKey::new(&sorted, metric, method);
                self.positions
                    .get_or_try_insert(key, || Self::optimize(&sorted, metric, method))
            },
        }
    }

    fn optimize(
        measurements: &[Measurement],
        metric: ErrorMetric,
        method: Method,
    ) -> Result<PositionEstimate, Error> {
        let initial = measurements
            .iter()
            .map(|m| &m.tower)
            .collect::<Averager>()
            .mean;

        let objective = |x: &Vector2<f64>| metric.evaluate(x[0], x[1], measurements);

        let minimum = Minimizer::new(method).minimize(objective, initial)?;

        let coordinate = Coordinate::wrapped(minimum.x[0], minimum.x[1]);
        let radius_km = minimum.value.abs() + RADIUS_FLOOR_KM;

        if !minimum.converged {
            warn!(
                "{}/{} - low confidence estimate {} (r={:.3}km)",
                metric, method, coordinate, radius_km
            );
        }

        Ok(PositionEstimate {
            coordinate,
            radius_km,
            converged: minimum.converged,
            towers: measurements.len(),
        })
    }

    /// Estimates the mobile position from raw [Observation]s, using this [Config].
    /// Unresolved towers are dropped, duplicates collapsed, then
    /// [Config::max_towers] are selected and converted to distances.
    pub fn estimate_position(
        &self,
        observations: &[Observation],
        cfg: &Config,
    ) -> Result<PositionEstimate, Error> {
        cfg.validate()?;

        let resolved = observations
            .iter()
            .filter(|obs| obs.tower.is_some())
            .copied()
            .collect::<Vec<_>>();

        if resolved.is_empty() {
            error!(
                "no resolved tower among {} observation(s)",
                observations.len()
            );
            return Err(Error::InsufficientData);
        }

        let unique = deduplicate(&resolved);
        let selected = cfg.selection.select(unique, cfg.max_towers);

        let mut measurements = Vec::with_capacity(selected.len());
        for obs in selected.iter() {
            let Some(tower) = obs.tower else {
                continue;
            };
            let distance_km = self.estimate_distance(obs, &cfg.propagation)?;
            measurements.push(Measurement::new(tower, distance_km));
        }

        let estimate = self.laterate(&measurements, cfg.metric, cfg.method)?;

        debug!(
            "{} - {} towers - {} r={:.3}km",
            cfg.label(),
            estimate.towers,
            estimate.coordinate,
            estimate.radius_km
        );

        Ok(estimate)
    }

    /// Distance cache usage
    pub fn distance_cache_statistics(&self) -> CacheStatistics {
        self.distances.statistics()
    }

    /// Position cache usage
    pub fn position_cache_statistics(&self) -> CacheStatistics {
        self.positions.statistics()
    }

    /// Drops all memoized results
    pub fn clear_cache(&self) {
        self.distances.clear();
        self.positions.clear();
    }
}
