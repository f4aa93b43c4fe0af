//! Closed-form price heuristic used when no trained model is available.

use crate::encoding::{CabinClass, StopBucket};

pub const BASE_PRICE: f64 = 3000.0;
const DURATION_RATE: f64 = 0.1;
const BUSINESS_MULTIPLIER: f64 = 2.5;

/// Multiplier for booking lead time. A departure exactly 7 days out still
/// counts as last-minute.
pub fn days_factor(days_left: u32) -> f64 {
    if days_left > 30 {
        0.8
    } else if days_left > 7 {
        1.0
    } else {
        1.5
    }
}

pub fn stops_factor(stops: StopBucket) -> f64 {
    match stops {
        StopBucket::Zero => 1.0,
        StopBucket::One => 0.85,
        StopBucket::TwoOrMore => 0.7,
        StopBucket::Unknown => 1.0,
    }
}

pub fn class_factor(cabin: CabinClass) -> f64 {
    match cabin {
        CabinClass::Business => BUSINESS_MULTIPLIER,
        CabinClass::Economy | CabinClass::Unknown => 1.0,
    }
}

/// Heuristic price, rounded to cents. Not bounded above.
pub fn estimate(duration: f64, days_left: u32, stops: StopBucket, cabin: CabinClass) -> f64 {
    let duration_factor = 1.0 + duration * DURATION_RATE;
    let price = BASE_PRICE
        * duration_factor
        * days_factor(days_left)
        * stops_factor(stops)
        * class_factor(cabin);

    round_to_cents(price)
}

pub(crate) fn round_to_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
