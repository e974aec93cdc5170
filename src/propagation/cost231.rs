//! COST-231 extension of the Hata model, 1.5 GHz to 2 GHz
//! (used as is for lower GSM bands as well).
use super::hata::{mobile_correction_large, mobile_correction_small, slope};

fn constant_term(urban: bool, f: f64, h_b: f64, h_m: f64) -> f64 {
    let (a_hm, c_m) = if urban {
        (mobile_correction_large(h_m), 3.0)
    } else {
        (mobile_correction_small(f, h_m), 0.0)
    };
    46.3 + 33.9 * f.log10() - 13.82 * h_b.log10() - a_hm + c_m
}

pub(crate) fn path_loss_db(urban: bool, h_b: f64, h_m: f64, distance_km: f64, f: f64) -> f64 {
    constant_term(urban, f, h_b, h_m) + slope(h_b) * distance_km.log10()
}

pub(crate) fn distance_km(urban: bool, h_b: f64, h_m: f64, path_loss_db: f64, f: f64) -> f64 {
    10.0_f64.powf((path_loss_db - constant_term(urban, f, h_b, h_m)) / slope(h_b))
}
