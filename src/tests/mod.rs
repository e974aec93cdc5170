mod position;

#[cfg(feature = "serde")]
mod config;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{Coordinate, Observation};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Three towers around Berlin, on P-GSM 900 channels
pub fn berlin_observations() -> Vec<Observation> {
    vec![
        Observation::new(Coordinate::new(52.520, 13.405), 40).with_arfcn(20),
        Observation::new(Coordinate::new(52.500, 13.440), 32).with_arfcn(62),
        Observation::new(Coordinate::new(52.490, 13.370), 28).with_arfcn(1),
    ]
}
