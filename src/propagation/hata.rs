//! Okumura-Hata empirical model, 150 MHz to 1.5 GHz.
//! Distances are expressed in km, heights in meters, frequencies in MHz.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hata environment class
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HataEnvironment {
    /// Open area (rural, no obstruction)
    Open,
    /// Suburban area
    Suburban,
    /// Small or medium sized city
    #[default]
    SmallUrban,
    /// Large city
    LargeUrban,
}

impl std::fmt::Display for HataEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Suburban => write!(f, "suburban"),
            Self::SmallUrban => write!(f, "urban_small"),
            Self::LargeUrban => write!(f, "urban_big"),
        }
    }
}

/// Mobile antenna height correction, small and medium cities
/// (also used for non urban environments).
pub(crate) fn mobile_correction_small(frequency_mhz: f64, mobile_height_m: f64) -> f64 {
    let log_f = frequency_mhz.log10();
    (1.1 * log_f - 0.7) * mobile_height_m - (1.56 * log_f - 0.8)
}

/// Mobile antenna height correction, large cities.
pub(crate) fn mobile_correction_large(mobile_height_m: f64) -> f64 {
    3.2 * (11.75 * mobile_height_m).log10().powi(2) - 4.97
}

/// Distance dependency of the path loss (dB per decade).
/// Only positive for realistic base station heights.
pub(crate) fn slope(base_height_m: f64) -> f64 {
    44.9 - 6.55 * base_height_m.log10()
}

/// Everything but the distance term
fn constant_term(env: HataEnvironment, f: f64, h_b: f64, h_m: f64) -> f64 {
    let log_f = f.log10();
    let c_h = match env {
        HataEnvironment::LargeUrban => mobile_correction_large(h_m),
        _ => mobile_correction_small(f, h_m),
    };

    let urban = 69.55 + 26.16 * log_f - 13.82 * h_b.log10() - c_h;

    match env {
        HataEnvironment::SmallUrban | HataEnvironment::LargeUrban => urban,
        HataEnvironment::Suburban => urban - 2.0 * (f / 28.0).log10().powi(2) - 5.4,
        HataEnvironment::Open => urban - 4.78 * log_f.powi(2) + 18.33 * log_f - 40.94,
    }
}

pub(crate) fn path_loss_db(
    env: HataEnvironment,
    h_b: f64,
    h_m: f64,
    distance_km: f64,
    f: f64,
) -> f64 {
    constant_term(env, f, h_b, h_m) + slope(h_b) * distance_km.log10()
}

pub(crate) fn distance_km(
    env: HataEnvironment,
    h_b: f64,
    h_m: f64,
    path_loss_db: f64,
    f: f64,
) -> f64 {
    let exponent = (path_loss_db - constant_term(env, f, h_b, h_m)) / slope(h_b);
    10.0_f64.powf(exponent)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn urban_reference() {
        // 900 MHz, hb=30 m, hm=1.5 m, 1 km: textbook value ~= 126.4 dB
        let pl = path_loss_db(HataEnvironment::SmallUrban, 30.0, 1.5, 1.0, 900.0);
        assert!((pl - 126.4).abs() < 0.2, "got {}", pl);
    }

    #[test]
    fn environments_ordering() {
        // same budget goes further in open areas
        let pl = 130.0;
        let open = distance_km(HataEnvironment::Open, 80.0, 3.0, pl, 935.0);
        let suburban = distance_km(HataEnvironment::Suburban, 80.0, 3.0, pl, 935.0);
        let urban = distance_km(HataEnvironment::SmallUrban, 80.0, 3.0, pl, 935.0);
        assert!(open > suburban);
        assert!(suburban > urban);
    }
}
