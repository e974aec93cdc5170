//! Memoization of propagation model and lateration results
use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        atomic::{AtomicU64, Ordering},
        RwLock,
    },
};

use crate::{
    metric::ErrorMetric,
    observation::Measurement,
    optimizer::Method,
    propagation::{HataEnvironment, PropagationModel},
};

/// Thread safe key-value [ResultCache]. Values are deterministic for a given key,
/// so concurrent insertions of the same key are harmless (last write wins).
#[derive(Debug)]
pub struct ResultCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// [ResultCache] usage statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStatistics {
    /// Ratio of lookups that hit the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

impl<K, V> Default for ResultCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<K: Eq + Hash, V: Clone> ResultCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns cached value, if any
    pub fn get(&self, key: &K) -> Option<V> {
        let value = match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        };
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Stores value
    pub fn set(&self, key: K, value: V) {
        match self.entries.write() {
            Ok(mut entries) => entries.insert(key, value),
            Err(poisoned) => poisoned.into_inner().insert(key, value),
        };
    }

    /// Returns cached value, or computes and stores it.
    /// Failures are not cached.
    pub fn get_or_try_insert<E, F: FnOnce() -> Result<V, E>>(
        &self,
        key: K,
        compute: F,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries and resets statistics
    pub fn clear(&self) {
        match self.entries.write() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

/// [PropagationModel] identity, floats by bit pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ModelKey {
    LogDistance {
        exponent: u64,
        offset_db: u64,
    },
    Hata {
        environment: HataEnvironment,
        base_height_m: u64,
        mobile_height_m: u64,
    },
    Cost231 {
        urban: bool,
        base_height_m: u64,
        mobile_height_m: u64,
    },
}

impl From<&PropagationModel> for ModelKey {
    fn from(model: &PropagationModel) -> Self {
        match *model {
            PropagationModel::LogDistance {
                exponent,
                offset_db,
            } => Self::LogDistance {
                exponent: exponent.to_bits(),
                offset_db: offset_db.to_bits(),
            },
            PropagationModel::Hata {
                environment,
                base_height_m,
                mobile_height_m,
            } => Self::Hata {
                environment,
                base_height_m: base_height_m.to_bits(),
                mobile_height_m: mobile_height_m.to_bits(),
            },
            PropagationModel::Cost231 {
                urban,
                base_height_m,
                mobile_height_m,
            } => Self::Cost231 {
                urban,
                base_height_m: base_height_m.to_bits(),
                mobile_height_m: mobile_height_m.to_bits(),
            },
        }
    }
}

/// Full input signature of a distance estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DistanceKey {
    model: ModelKey,
    dbm: u64,
    frequency_mhz: u64,
    tx_power_dbm: u64,
}

impl DistanceKey {
    pub fn new(model: &PropagationModel, dbm: f64, frequency_mhz: f64, tx_power_dbm: f64) -> Self {
        Self {
            model: model.into(),
            dbm: dbm.to_bits(),
            frequency_mhz: frequency_mhz.to_bits(),
            tx_power_dbm: tx_power_dbm.to_bits(),
        }
    }
}

/// Full input signature of a lateration: canonically sorted measurement set,
/// [ErrorMetric] and [Method].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaterationKey {
    measurements: Vec<(u64, u64, u64)>,
    metric: ErrorMetric,
    method: Method,
}

impl LaterationKey {
    /// Builds new [LaterationKey]. `measurements` are expected sorted
    /// (see [canonical_order]).
    pub fn new(measurements: &[Measurement], metric: ErrorMetric, method: Method) -> Self {
        Self {
            measurements: measurements
                .iter()
                .map(|m| {
                    (
                        m.tower.latitude.to_bits(),
                        m.tower.longitude.to_bits(),
                        m.distance_km.to_bits(),
                    )
                })
                .collect(),
            metric,
            method,
        }
    }
}

/// Sorts [Measurement]s in a canonical order, so identical sets
/// lead to identical keys and identical computations.
pub fn canonical_order(measurements: &mut [Measurement]) {
    measurements.sort_by(|a, b| {
        a.tower
            .latitude
            .total_cmp(&b.tower.latitude)
            .then(a.tower.longitude.total_cmp(&b.tower.longitude))
            .then(a.distance_km.total_cmp(&b.distance_km))
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::Coordinate;
    use std::{sync::Arc, thread};

    #[test]
    fn get_set() {
        let cache = ResultCache::<u32, f64>::new();
        assert!(cache.get(&1).is_none());
        cache.set(1, 2.0);
        assert_eq!(cache.get(&1), Some(2.0));
        let stats = cache.statistics();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.statistics(), CacheStatistics::default());
    }

    #[test]
    fn failures_not_cached() {
        let cache = ResultCache::<u32, f64>::new();
        let failed: Result<f64, &str> = cache.get_or_try_insert(1, || Err("failure"));
        assert!(failed.is_err());
        assert!(cache.is_empty());
        let value: Result<f64, &str> = cache.get_or_try_insert(1, || Ok(3.0));
        assert_eq!(value, Ok(3.0));
        let value: Result<f64, &str> = cache.get_or_try_insert(1, || Err("not evaluated"));
        assert_eq!(value, Ok(3.0));
    }

    #[test]
    fn concurrent_writes() {
        let cache = Arc::new(ResultCache::<u32, u32>::new());
        let handles = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for key in 0..100 {
                        cache.set(key, key * 2);
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.get(&42), Some(84));
    }

    #[test]
    fn distance_keys() {
        let a = DistanceKey::new(&PropagationModel::default(), -93.0, 935.0, 43.0);
        let b = DistanceKey::new(&PropagationModel::default(), -93.0, 935.0, 43.0);
        let c = DistanceKey::new(&PropagationModel::cost231(true), -93.0, 935.0, 43.0);
        let d = DistanceKey::new(&PropagationModel::default(), -93.5, 935.0, 43.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn lateration_keys() {
        let mut lhs = vec![
            Measurement::new(Coordinate::new(52.1, 13.0), 1.0),
            Measurement::new(Coordinate::new(52.0, 13.0), 2.0),
        ];
        let mut rhs = vec![lhs[1], lhs[0]];
        canonical_order(&mut lhs);
        canonical_order(&mut rhs);
        assert_eq!(
            LaterationKey::new(&lhs, ErrorMetric::MAE, Method::NelderMead),
            LaterationKey::new(&rhs, ErrorMetric::MAE, Method::NelderMead),
        );
        assert_ne!(
            LaterationKey::new(&lhs, ErrorMetric::MAE, Method::NelderMead),
            LaterationKey::new(&lhs, ErrorMetric::ME, Method::NelderMead),
        );
    }
}
