//! Feature extraction for flight queries
//!
//! Turns a [`FlightQuery`] into the fixed-width vector the linear model was
//! fitted against. The position of every value is part of the model contract:
//! coefficients are bound to indices, never to names.
use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::encoding::{CabinClass, CategoryCode, Carrier, StopBucket, TimeBucket};
use crate::routes::{route_key, RouteVocabulary, UNKNOWN_ROUTE_CODE};

/// Number of values in a feature vector.
pub const FEATURE_COUNT: usize = 8;

/// Feature names in schema order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "airline_code",
    "stops",
    "duration",
    "days_left",
    "class_code",
    "departure_time_code",
    "arrival_time_code",
    "route_code",
];

/// Schema positions.
pub mod index {
    pub const CARRIER: usize = 0;
    pub const STOPS: usize = 1;
    pub const DURATION: usize = 2;
    pub const DAYS_LEFT: usize = 3;
    pub const CLASS: usize = 4;
    pub const DEPARTURE: usize = 5;
    pub const ARRIVAL: usize = 6;
    pub const ROUTE: usize = 7;
}

/// A single trip to be priced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Operating carrier (`SpiceJet`, `Air_India`, ...)
    #[serde(alias = "airline")]
    pub carrier: Carrier,
    /// Origin city
    #[serde(alias = "source_city")]
    pub origin: String,
    /// Destination city
    #[serde(alias = "destination_city")]
    pub destination: String,
    /// Departure period of the day
    #[serde(alias = "departure_time")]
    pub departure: TimeBucket,
    /// Number of layovers
    pub stops: StopBucket,
    /// Arrival period of the day
    #[serde(alias = "arrival_time")]
    pub arrival: TimeBucket,
    /// Cabin class
    #[serde(alias = "flight_class", alias = "class")]
    pub cabin: CabinClass,
    /// Flight duration in hours
    pub duration: f64,
    /// Days between booking and departure
    pub days_left: u32,
}

impl FlightQuery {
    /// Vocabulary key of this query's origin/destination pair.
    pub fn route_key(&self) -> String {
        route_key(&self.origin, &self.destination)
    }
}

/// Ordered numeric encoding of a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pairs each value with its schema name.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

/// Extract the feature vector of a query.
///
/// Without a vocabulary (or with an empty one) the route code is 0.
/// Duration and days-left pass through unchanged; no validation is
/// performed on them.
pub fn extract_features(query: &FlightQuery, routes: Option<&RouteVocabulary>) -> FeatureVector {
    let route_code = match routes {
        Some(vocab) if !vocab.is_empty() => vocab.lookup(&query.route_key()),
        _ => UNKNOWN_ROUTE_CODE,
    };

    FeatureVector([
        query.carrier.code() as f64,
        query.stops.code() as f64,
        query.duration,
        query.days_left as f64,
        query.cabin.code() as f64,
        query.departure.code() as f64,
        query.arrival.code() as f64,
        route_code as f64,
    ])
}
