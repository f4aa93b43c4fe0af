//! Flight price estimation core
//!
//! Encodes trip attributes into a fixed feature schema, applies a linear
//! regression fitted offline, and falls back to a closed-form heuristic when
//! no model has been trained.
//!
//! Modules:
//! - `encoding`: Static category enumerations (carrier, stops, class, time of day)
//! - `routes`: Route vocabulary built at training time
//! - `features`: Query type and feature vector extraction
//! - `model`: Linear model and its schema checks
//! - `fallback`: Heuristic estimator
//! - `artifacts`: Artifact store trait and model/vocabulary persistence
//! - `predictor`: Lazily loaded inference service
//! - `config`: TOML/environment configuration

pub mod artifacts;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod fallback;
pub mod features;
pub mod model;
pub mod predictor;
pub mod routes;
pub mod serialization;

pub use artifacts::{ArtifactNames, ArtifactStore, FsArtifactStore, MemoryArtifactStore, ModelArtifacts, SaveReport};
pub use config::{ArtifactConfig, LoggingConfig, PriceConfig, PricingConfig, TrainingConfig};
pub use encoding::{encode, CabinClass, CategoryClass, CategoryCode, Carrier, StopBucket, TimeBucket};
pub use errors::{PriceError, Result};
pub use features::{extract_features, FeatureVector, FlightQuery, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{LinearModel, ModelMetadata};
pub use predictor::{EstimateSource, PriceEstimate, PricePredictor};
pub use routes::{route_key, RouteOrdering, RouteVocabulary, UNKNOWN_ROUTE_CODE};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a predictor over the configured artifact directory. Fails on an
/// unusable price band.
pub fn predictor_from_config(config: &PriceConfig) -> Result<PricePredictor<FsArtifactStore>> {
    config.pricing.validate()?;
    Ok(PricePredictor::new(
        FsArtifactStore::new(&config.artifacts.directory),
        config.artifacts.names(),
        config.pricing.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictor_from_config_rejects_inverted_band() {
        let mut config = PriceConfig::default();
        config.pricing.min_price = 5_000.0;
        config.pricing.max_price = 10.0;
        assert!(matches!(predictor_from_config(&config), Err(PriceError::InvalidConfig(_))));

        assert!(predictor_from_config(&PriceConfig::default()).is_ok());
    }
}
