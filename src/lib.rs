#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod averager;
mod band;
mod batch;
mod cache;
mod cfg;
mod constants;
mod dedup;
mod error;
mod metric;
mod observation;
mod optimizer;
mod position;
mod propagation;
mod solver;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::band::Band;
    pub use crate::batch::{AtomicProgress, Batch, NoopProgress, ProgressCallback, Track};
    pub use crate::cache::CacheStatistics;
    pub use crate::cfg::{Config, TowerSelection};
    pub use crate::dedup::deduplicate;
    pub use crate::metric::ErrorMetric;
    pub use crate::observation::{
        dbm_to_level, dbm_to_mw, level_to_dbm, mw_to_dbm, Measurement, Observation,
    };
    pub use crate::optimizer::{Bounds, Method, Minimizer, Minimum};
    pub use crate::position::{wrap, Coordinate};
    pub use crate::propagation::{HataEnvironment, PropagationContext, PropagationModel};
    pub use crate::solver::{PositionEstimate, Solver};
    // re-export
    pub use nalgebra::Vector2;
}

// pub export
pub use error::Error;
