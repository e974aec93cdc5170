use crate::{constants::ARFCN_UNKNOWN, error::Error};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// GSM frequency band, as identified by the ARFCN.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Band {
    /// GSM 450 (ARFCN 259..=293)
    Gsm450,
    /// GSM 480 (ARFCN 306..=340)
    Gsm480,
    /// GSM 700 (ARFCN 438..=511)
    Gsm700,
    /// GSM 850 (ARFCN 128..=251)
    Gsm850,
    /// P-GSM 900 (ARFCN 0..=124)
    #[default]
    Gsm900,
    /// E-GSM 900 extension (ARFCN 955..=1023)
    EGsm900,
    /// DCS 1800 (ARFCN 512..=885)
    Dcs1800,
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::Gsm450 | Self::Gsm480 => write!(f, "GSM 500"),
            Self::Gsm700 => write!(f, "GSM 700"),
            Self::Gsm850 => write!(f, "GSM 850"),
            Self::Gsm900 | Self::EGsm900 => write!(f, "GSM 900"),
            Self::Dcs1800 => write!(f, "GSM 1800"),
        }
    }
}

impl Band {
    /// Identifies the [Band] this ARFCN belongs to.
    /// A missing channel (or the modem "unknown" sentinel) is interpreted as ARFCN 0.
    pub fn from_arfcn(arfcn: Option<u16>) -> Result<Self, Error> {
        match normalize(arfcn) {
            0..=124 => Ok(Self::Gsm900),
            128..=251 => Ok(Self::Gsm850),
            259..=293 => Ok(Self::Gsm450),
            306..=340 => Ok(Self::Gsm480),
            438..=511 => Ok(Self::Gsm700),
            512..=885 => Ok(Self::Dcs1800),
            955..=1023 => Ok(Self::EGsm900),
            other => Err(Error::UnknownChannel(other)),
        }
    }

    /// (first ARFCN, first uplink frequency MHz) of this [Band]
    fn origin(&self) -> (i32, f64) {
        match self {
            Self::Gsm900 => (0, 890.0),
            Self::Gsm850 => (128, 824.2),
            Self::Gsm450 => (259, 450.6),
            Self::Gsm480 => (306, 479.0),
            Self::Gsm700 => (438, 747.2),
            Self::Dcs1800 => (512, 1710.2),
            Self::EGsm900 => (1024, 890.0),
        }
    }

    /// Uplink / downlink duplex spacing (MHz)
    pub fn duplex_spacing_mhz(&self) -> f64 {
        match self {
            Self::Gsm900 | Self::EGsm900 | Self::Gsm850 => 45.0,
            Self::Gsm450 | Self::Gsm480 => 10.0,
            Self::Gsm700 => 30.0,
            Self::Dcs1800 => 95.0,
        }
    }
}

fn normalize(arfcn: Option<u16>) -> u16 {
    match arfcn {
        Some(ARFCN_UNKNOWN) | None => 0,
        Some(arfcn) => arfcn,
    }
}

/// Mobile to base station carrier frequency (MHz), for this ARFCN.
pub fn uplink_frequency_mhz(arfcn: Option<u16>) -> Result<f64, Error> {
    let band = Band::from_arfcn(arfcn)?;
    let (first, f0) = band.origin();
    let n = normalize(arfcn) as i32;
    Ok(f0 + 0.2 * (n - first) as f64)
}

/// Base station to mobile carrier frequency (MHz), for this ARFCN.
/// This is the frequency our received levels were measured on.
pub fn downlink_frequency_mhz(arfcn: Option<u16>) -> Result<f64, Error> {
    let band = Band::from_arfcn(arfcn)?;
    Ok(uplink_frequency_mhz(arfcn)? + band.duplex_spacing_mhz())
}
