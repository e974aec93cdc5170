//! Cell tower observations
use crate::{
    band::{downlink_frequency_mhz, Band},
    constants::RX_LEVEL_OFFSET_DBM,
    error::Error,
    position::Coordinate,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Converts a raw received level (half dBm steps) to dBm.
pub fn level_to_dbm(level: i32) -> f64 {
    RX_LEVEL_OFFSET_DBM + level as f64 / 2.0
}

/// Converts dBm to received level (inverse of [level_to_dbm]).
pub fn dbm_to_level(dbm: f64) -> f64 {
    (dbm - RX_LEVEL_OFFSET_DBM) * 2.0
}

/// Converts dBm to mW.
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10.0_f64.powf(dbm / 10.0)
}

/// Converts mW to dBm.
pub fn mw_to_dbm(mw: f64) -> f64 {
    10.0 * mw.log10()
}

/// Single cell tower [Observation], as reported by the tracking device
/// and completed by the tower location lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Tower location, if the lookup succeeded.
    /// Unresolved towers never contribute.
    pub tower: Option<Coordinate>,
    /// Raw received signal level
    pub level: i32,
    /// Absolute radio frequency channel number
    pub arfcn: Option<u16>,
    /// Modem reported signal quality indicator, informative only
    pub quality: Option<u8>,
}

impl Observation {
    /// Builds new [Observation] of a resolved tower
    pub fn new(tower: Coordinate, level: i32) -> Self {
        Self {
            tower: Some(tower),
            level,
            arfcn: None,
            quality: None,
        }
    }

    /// Builds new [Observation] of a tower whose location is unknown
    pub fn unresolved(level: i32) -> Self {
        Self {
            tower: None,
            level,
            arfcn: None,
            quality: None,
        }
    }

    /// Copies and returns [Observation] with ARFCN
    pub fn with_arfcn(&self, arfcn: u16) -> Self {
        let mut s = *self;
        s.arfcn = Some(arfcn);
        s
    }

    /// Copies and returns [Observation] with signal quality indicator
    pub fn with_quality(&self, quality: u8) -> Self {
        let mut s = *self;
        s.quality = Some(quality);
        s
    }

    /// Received power in dBm
    pub fn dbm(&self) -> f64 {
        level_to_dbm(self.level)
    }

    /// Received power in mW
    pub fn mw(&self) -> f64 {
        dbm_to_mw(self.dbm())
    }

    /// GSM [Band] this [Observation] was made on
    pub fn band(&self) -> Result<Band, Error> {
        Band::from_arfcn(self.arfcn)
    }

    /// Carrier frequency (MHz) the level was measured on
    pub fn frequency_mhz(&self) -> Result<f64, Error> {
        downlink_frequency_mhz(self.arfcn)
    }
}

/// Tower location and estimated distance to that tower:
/// the solver input.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Tower location
    pub tower: Coordinate,
    /// Estimated distance to tower (km)
    pub distance_km: f64,
}

impl Measurement {
    pub fn new(tower: Coordinate, distance_km: f64) -> Self {
        Self { tower, distance_km }
    }
}
