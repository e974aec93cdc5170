//! Parallel estimation of many samples under many [Config]urations
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{
    cfg::Config,
    observation::Observation,
    solver::{PositionEstimate, Solver},
};

/// Receives [Batch] progress updates.
///
/// Called from parallel rayon threads. Implementations must be thread-safe.
pub trait ProgressCallback: Send + Sync {
    /// Called once, before any work, with the number of configurations to process.
    fn on_start(&self, total: usize);
    /// Called after completing one configuration.
    fn on_progress(&self, completed: usize, total: usize);
}

/// Discards progress updates
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_start(&self, _total: usize) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Progress tracker that can be polled from another thread.
#[derive(Debug, Default)]
pub struct AtomicProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl AtomicProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    /// Completion ratio, 1.0 once done (or when there was nothing to do).
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total > 0 {
            self.completed() as f64 / total as f64
        } else {
            1.0
        }
    }
}

impl ProgressCallback for AtomicProgress {
    fn on_start(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn on_progress(&self, completed: usize, _total: usize) {
        // updates may be delivered out of order
        self.completed.fetch_max(completed, Ordering::SeqCst);
    }
}

/// Estimates of every sample under one [Config]
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub config: Config,
    /// [Config::label]
    pub label: String,
    /// Successful estimates, with the index of their sample
    pub estimates: Vec<(usize, PositionEstimate)>,
    /// Number of samples that failed and were skipped
    pub failures: usize,
}

/// [Batch] runs every [Config] over a series of samples,
/// where each sample is the set of [Observation]s collected at one point in time.
/// All configurations share one [Solver] (and its caches).
pub struct Batch {
    solver: Solver,
    configs: Vec<Config>,
    progress: Arc<dyn ProgressCallback>,
}

impl Batch {
    /// Builds new [Batch]
    pub fn new(solver: Solver, configs: Vec<Config>) -> Self {
        Self {
            solver,
            configs,
            progress: Arc::new(NoopProgress),
        }
    }

    /// Returns [Batch] reporting to this [ProgressCallback]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// [Solver] used by this [Batch]
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Runs all configurations, and the samples of each configuration, in parallel.
    /// Returns one [Track] per [Config], in [Config] order, with estimates in sample order.
    /// Per sample failures never abort the [Batch].
    pub fn run<S: AsRef<[Observation]> + Sync>(&self, samples: &[S]) -> Vec<Track> {
        let total = self.configs.len();
        let completed = AtomicUsize::new(0);

        info!(
            "batch: {} configurations x {} samples",
            total,
            samples.len()
        );
        self.progress.on_start(total);

        let tracks = self
            .configs
            .par_iter()
            .map(|cfg| {
                let track = self.track(cfg, samples);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                self.progress.on_progress(done, total);
                track
            })
            .collect::<Vec<_>>();

        let stats = self.solver.position_cache_statistics();
        debug!(
            "batch: done - position cache hit rate {:.1}%",
            stats.hit_rate() * 100.0
        );

        tracks
    }

    fn track<S: AsRef<[Observation]> + Sync>(&self, cfg: &Config, samples: &[S]) -> Track {
        let label = cfg.label();

        // samples are independent: rayon nests this within the per config iteration
        let results = samples
            .par_iter()
            .enumerate()
            .map(|(index, sample)| {
                self.solver
                    .estimate_position(sample.as_ref(), cfg)
                    .map(|estimate| (index, estimate))
                    .map_err(|e| {
                        warn!("{} - sample #{} skipped: {}", label, index, e);
                    })
            })
            .collect::<Vec<_>>();

        let failures = results.iter().filter(|result| result.is_err()).count();
        let estimates = results.into_iter().flatten().collect::<Vec<_>>();

        Track {
            config: *cfg,
            label,
            estimates,
            failures,
        }
    }
}
