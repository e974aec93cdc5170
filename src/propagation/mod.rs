//! Radio propagation models: received power to distance
use log::debug;

use crate::{
    constants::{DEFAULT_BASE_HEIGHT_M, DEFAULT_MOBILE_HEIGHT_M, MAX_TX_POWER_MW},
    error::Error,
    observation::mw_to_dbm,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod cost231;
mod hata;
mod path_loss;

pub use hata::HataEnvironment;

/// [PropagationModel] converts an available path loss budget to a distance.
/// Each variant carries its own parametrization.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropagationModel {
    /// Log-distance path loss: PL = 10 v log10(4 pi d / lambda) + C
    LogDistance {
        /// Path loss exponent v (2: free space, 3.5: outdoor, 6: indoor)
        exponent: f64,
        /// Constant offset C (dB)
        offset_db: f64,
    },
    /// Okumura-Hata empirical model
    Hata {
        environment: HataEnvironment,
        /// Base station antenna height (m)
        base_height_m: f64,
        /// Mobile station antenna height (m)
        mobile_height_m: f64,
    },
    /// COST-231 Hata extension
    Cost231 {
        /// Metropolitan center correction (3 dB)
        urban: bool,
        /// Base station antenna height (m)
        base_height_m: f64,
        /// Mobile station antenna height (m)
        mobile_height_m: f64,
    },
}

impl Default for PropagationModel {
    fn default() -> Self {
        Self::hata(HataEnvironment::SmallUrban)
    }
}

impl PropagationModel {
    /// Free space log-distance model
    pub fn free_space() -> Self {
        Self::log_distance(2.0)
    }

    /// Outdoor log-distance model
    pub fn outdoor() -> Self {
        Self::log_distance(3.5)
    }

    /// Indoor (no line of sight) log-distance model
    pub fn indoor() -> Self {
        Self::log_distance(6.0)
    }

    /// Log-distance model with this exponent and no offset
    pub fn log_distance(exponent: f64) -> Self {
        Self::LogDistance {
            exponent,
            offset_db: 0.0,
        }
    }

    /// Hata model with default antenna heights
    pub fn hata(environment: HataEnvironment) -> Self {
        Self::Hata {
            environment,
            base_height_m: DEFAULT_BASE_HEIGHT_M,
            mobile_height_m: DEFAULT_MOBILE_HEIGHT_M,
        }
    }

    /// COST-231 Hata model with default antenna heights
    pub fn cost231(urban: bool) -> Self {
        Self::Cost231 {
            urban,
            base_height_m: DEFAULT_BASE_HEIGHT_M,
            mobile_height_m: DEFAULT_MOBILE_HEIGHT_M,
        }
    }

    /// All named presets
    pub fn presets() -> [Self; 9] {
        [
            Self::hata(HataEnvironment::LargeUrban),
            Self::hata(HataEnvironment::SmallUrban),
            Self::hata(HataEnvironment::Open),
            Self::hata(HataEnvironment::Suburban),
            Self::cost231(true),
            Self::cost231(false),
            Self::free_space(),
            Self::outdoor(),
            Self::indoor(),
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            Self::LogDistance { .. } => "log-distance",
            Self::Hata { .. } => "hata",
            Self::Cost231 { .. } => "cost231",
        }
    }

    /// Returns preset name, if this model matches one of the presets exactly.
    pub fn preset_name(&self) -> Option<&'static str> {
        const NAMES: [&str; 9] = [
            "hata_urban_big",
            "hata_urban_small",
            "hata_open",
            "hata_suburban",
            "hata_cost_urban",
            "hata_cost_rural",
            "path_loss_free",
            "path_loss_outdoor",
            "path_loss_indoor",
        ];
        Self::presets()
            .iter()
            .position(|preset| preset == self)
            .map(|i| NAMES[i])
    }

    /// Verifies this parametrization may be evaluated at this frequency.
    pub fn validate(&self, frequency_mhz: f64) -> Result<(), Error> {
        if !(frequency_mhz > 0.0) {
            return Err(Error::InvalidFrequency(frequency_mhz));
        }
        match *self {
            Self::LogDistance { exponent, .. } => {
                if !(exponent > 0.0) {
                    return Err(Error::InvalidPathLossExponent(exponent));
                }
            },
            Self::Hata {
                base_height_m,
                mobile_height_m,
                ..
            }
            | Self::Cost231 {
                base_height_m,
                mobile_height_m,
                ..
            } => {
                for h in [base_height_m, mobile_height_m] {
                    if !(h > 0.0) {
                        return Err(Error::InvalidAntennaHeight(h));
                    }
                }
                if !(hata::slope(base_height_m) > 0.0) {
                    return Err(Error::InvalidAntennaHeight(base_height_m));
                }
            },
        }
        Ok(())
    }

    /// Path loss (dB) predicted at this distance (km), for this carrier frequency (MHz).
    pub fn path_loss_db(&self, distance_km: f64, frequency_mhz: f64) -> Result<f64, Error> {
        self.validate(frequency_mhz)?;
        let pl = match *self {
            Self::LogDistance {
                exponent,
                offset_db,
            } => path_loss::path_loss_db(exponent, offset_db, distance_km, frequency_mhz),
            Self::Hata {
                environment,
                base_height_m,
                mobile_height_m,
            } => hata::path_loss_db(
                environment,
                base_height_m,
                mobile_height_m,
                distance_km,
                frequency_mhz,
            ),
            Self::Cost231 {
                urban,
                base_height_m,
                mobile_height_m,
            } => cost231::path_loss_db(
                urban,
                base_height_m,
                mobile_height_m,
                distance_km,
                frequency_mhz,
            ),
        };
        Ok(pl)
    }

    /// Distance (km) at which this path loss (dB) is reached, for this carrier frequency (MHz).
    /// Closed form inversion of [Self::path_loss_db].
    pub fn distance_km(&self, path_loss_db: f64, frequency_mhz: f64) -> Result<f64, Error> {
        self.validate(frequency_mhz)?;
        let d = match *self {
            Self::LogDistance {
                exponent,
                offset_db,
            } => path_loss::distance_km(exponent, offset_db, path_loss_db, frequency_mhz),
            Self::Hata {
                environment,
                base_height_m,
                mobile_height_m,
            } => hata::distance_km(
                environment,
                base_height_m,
                mobile_height_m,
                path_loss_db,
                frequency_mhz,
            ),
            Self::Cost231 {
                urban,
                base_height_m,
                mobile_height_m,
            } => cost231::distance_km(
                urban,
                base_height_m,
                mobile_height_m,
                path_loss_db,
                frequency_mhz,
            ),
        };
        if d.is_finite() && d >= 0.0 {
            Ok(d)
        } else {
            Err(Error::NonFiniteDistance(self.name()))
        }
    }
}

impl std::fmt::Display for PropagationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(name) = self.preset_name() {
            return write!(f, "{}", name);
        }
        match self {
            Self::LogDistance {
                exponent,
                offset_db,
            } => write!(f, "path_loss(v={}, C={})", exponent, offset_db),
            Self::Hata {
                environment,
                base_height_m,
                mobile_height_m,
            } => write!(
                f,
                "hata_{}(hb={}, hm={})",
                environment, base_height_m, mobile_height_m
            ),
            Self::Cost231 {
                urban,
                base_height_m,
                mobile_height_m,
            } => write!(
                f,
                "hata_cost_{}(hb={}, hm={})",
                if *urban { "urban" } else { "rural" },
                base_height_m,
                mobile_height_m
            ),
        }
    }
}

impl std::str::FromStr for PropagationModel {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hata_urban_big" | "hata_urban_large" => Ok(Self::hata(HataEnvironment::LargeUrban)),
            "hata_urban_small" | "hata_urban_medium" | "hata" => {
                Ok(Self::hata(HataEnvironment::SmallUrban))
            },
            "hata_open" => Ok(Self::hata(HataEnvironment::Open)),
            "hata_suburban" => Ok(Self::hata(HataEnvironment::Suburban)),
            "hata_cost_urban" => Ok(Self::cost231(true)),
            "hata_cost_rural" => Ok(Self::cost231(false)),
            "path_loss_free" => Ok(Self::free_space()),
            "path_loss_outdoor" => Ok(Self::outdoor()),
            "path_loss_indoor" => Ok(Self::indoor()),
            _ => Err(Error::UnknownPropagationModel),
        }
    }
}

fn default_tx_power_dbm() -> f64 {
    mw_to_dbm(MAX_TX_POWER_MW)
}

/// [PropagationContext] fully determines the distance estimated for a received level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PropagationContext {
    /// [PropagationModel] to use
    #[cfg_attr(feature = "serde", serde(default))]
    pub model: PropagationModel,
    /// Transmit power reference (dBm) the available path loss is computed against
    #[cfg_attr(feature = "serde", serde(default = "default_tx_power_dbm"))]
    pub tx_power_dbm: f64,
    /// Carrier frequency (MHz). When not defined, the frequency
    /// of each observation's channel is used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub frequency_mhz: Option<f64>,
}

impl Default for PropagationContext {
    fn default() -> Self {
        Self {
            model: PropagationModel::default(),
            tx_power_dbm: default_tx_power_dbm(),
            frequency_mhz: None,
        }
    }
}

impl PropagationContext {
    /// Builds new [PropagationContext] from [PropagationModel], using default reference power.
    pub fn new(model: PropagationModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    /// Copies and returns [PropagationContext] with fixed carrier frequency (MHz).
    pub fn with_frequency_mhz(&self, frequency_mhz: f64) -> Self {
        let mut s = *self;
        s.frequency_mhz = Some(frequency_mhz);
        s
    }

    /// Copies and returns [PropagationContext] with transmit power reference (dBm).
    pub fn with_tx_power_dbm(&self, tx_power_dbm: f64) -> Self {
        let mut s = *self;
        s.tx_power_dbm = tx_power_dbm;
        s
    }

    /// Path loss budget (dB) for this received power (dBm)
    pub fn available_path_loss_db(&self, dbm: f64) -> f64 {
        self.tx_power_dbm - dbm
    }

    /// Distance (km) to transmitter, from received power (dBm) on this carrier (MHz).
    pub fn distance_km(&self, dbm: f64, frequency_mhz: f64) -> Result<f64, Error> {
        let pl = self.available_path_loss_db(dbm);
        let d = self.model.distance_km(pl, frequency_mhz)?;
        debug!(
            "{} - rx={:.1}dBm f={:.1}MHz pl={:.2}dB - d={:.3}km",
            self.model, dbm, frequency_mhz, pl, d
        );
        Ok(d)
    }

    /// Received power (dBm) expected at this distance (km) on this carrier (MHz).
    pub fn received_dbm(&self, distance_km: f64, frequency_mhz: f64) -> Result<f64, Error> {
        let pl = self.model.path_loss_db(distance_km, frequency_mhz)?;
        Ok(self.tx_power_dbm - pl)
    }
}
