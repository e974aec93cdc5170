use log::debug;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::{error::Error, observation::Observation};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Strategy used to select the contributing towers,
/// when more than `max_towers` are available.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TowerSelection {
    /// Keep the strongest towers
    #[default]
    Strongest,
    /// Keep a random subset. Seeded, so the draw is reproducible.
    Random { seed: u64 },
}

impl std::fmt::Display for TowerSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Strongest => write!(f, "strongest"),
            Self::Random { .. } => write!(f, "random"),
        }
    }
}

impl std::str::FromStr for TowerSelection {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strongest" | "rxl" => Ok(Self::Strongest),
            "random" => Ok(Self::random()),
            _ => Err(Error::UnknownTowerSelection),
        }
    }
}

impl TowerSelection {
    /// Random selection with default seed
    pub fn random() -> Self {
        Self::Random { seed: 0 }
    }

    /// Retains at most `max_towers` among these deduplicated [Observation]s,
    /// re-sorted strongest first. `None` retains everything.
    pub(crate) fn select(
        &self,
        mut observations: Vec<Observation>,
        max_towers: Option<usize>,
    ) -> Vec<Observation> {
        let Some(max_towers) = max_towers else {
            return observations;
        };

        if observations.len() > max_towers {
            if let Self::Random { seed } = self {
                let mut rng = SmallRng::seed_from_u64(*seed);
                observations.shuffle(&mut rng);
            }
            debug!(
                "{} selection: retaining {}/{} towers",
                self,
                max_towers,
                observations.len()
            );
            observations.truncate(max_towers);
        }

        observations.sort_by(|a, b| b.level.cmp(&a.level));
        observations
    }
}
