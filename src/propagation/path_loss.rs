//! Log-distance path loss model
use crate::constants::SPEED_OF_LIGHT_M_S;
use std::f64::consts::PI;

/// Carrier wavelength (meters)
fn wavelength_m(frequency_mhz: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / (frequency_mhz * 1.0E6)
}

/// PL = 10 v log10(4 pi d / lambda) + C, with d in meters.
pub(crate) fn path_loss_db(
    exponent: f64,
    offset_db: f64,
    distance_km: f64,
    frequency_mhz: f64,
) -> f64 {
    let d_m = distance_km * 1.0E3;
    10.0 * exponent * (4.0 * PI * d_m / wavelength_m(frequency_mhz)).log10() + offset_db
}

/// Closed form inversion of [path_loss_db].
pub(crate) fn distance_km(
    exponent: f64,
    offset_db: f64,
    path_loss_db: f64,
    frequency_mhz: f64,
) -> f64 {
    let ratio = 10.0_f64.powf((path_loss_db - offset_db) / (10.0 * exponent));
    let d_m = ratio * wavelength_m(frequency_mhz) / (4.0 * PI);
    d_m / 1.0E3
}
