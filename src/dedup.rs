//! Observation deduplication
use log::debug;

use crate::{constants::DUPLICATE_TOWER_THRESHOLD_M, observation::Observation};

/// Collapses [Observation]s of (nearly) co-located towers: towers closer than
/// [DUPLICATE_TOWER_THRESHOLD_M] are considered identical and only the strongest
/// observation is retained. Unresolved towers are expected to be filtered out
/// prior to this step, they are dropped here anyway.
/// Returned set is sorted by received level, strongest first (stable for equal levels).
pub fn deduplicate(observations: &[Observation]) -> Vec<Observation> {
    let mut retained: Vec<Observation> = Vec::with_capacity(observations.len());

    for obs in observations.iter() {
        let Some(tower) = obs.tower else {
            continue;
        };

        let matches = retained
            .iter()
            .enumerate()
            .filter_map(|(index, kept)| {
                let kept_tower = kept.tower?;
                (tower.geodesic_distance_m(&kept_tower) < DUPLICATE_TOWER_THRESHOLD_M)
                    .then_some(index)
            })
            .collect::<Vec<_>>();

        let Some(&first) = matches.first() else {
            retained.push(*obs);
            continue;
        };

        // a tower may bridge several retained entries: the whole group collapses
        // to its strongest member, earliest one on equal levels
        let mut winner = retained[first];
        for &index in matches[1..].iter() {
            if retained[index].level > winner.level {
                winner = retained[index];
            }
        }
        if obs.level > winner.level {
            debug!(
                "{} - duplicate tower: level {} replaces {}",
                tower, obs.level, winner.level
            );
            winner = *obs;
        } else {
            debug!(
                "{} - duplicate tower: level {} dropped (kept {})",
                tower, obs.level, winner.level
            );
        }

        retained[first] = winner;
        for &index in matches[1..].iter().rev() {
            debug!("{} - duplicate tower: merged", tower);
            retained.remove(index);
        }
    }

    retained.sort_by(|a, b| b.level.cmp(&a.level));
    retained
}
