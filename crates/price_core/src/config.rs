//! Configuration for training and serving

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::artifacts::ArtifactNames;
use crate::errors::{PriceError, Result};
use crate::routes::RouteOrdering;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "FLIGHT_PRICE_";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PriceConfig {
    pub artifacts: ArtifactConfig,
    pub training: TrainingConfig,
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

/// Where the model artifact pair lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory holding the artifacts
    pub directory: PathBuf,
    pub model_file: String,
    pub routes_file: String,
    pub hash_file: String,
}

/// Training job settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// CSV dataset path
    pub dataset_path: PathBuf,
    /// Seed of the train/test split
    pub seed: u64,
    /// Fraction of rows held out for evaluation
    pub test_size: f64,
    /// Route code assignment order
    pub route_ordering: RouteOrdering,
}

/// Output price band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub min_price: f64,
    pub max_price: f64,
    /// Apply the band to fallback estimates as well
    pub clamp_fallback: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        let names = ArtifactNames::default();
        Self {
            directory: PathBuf::from("./models"),
            model_file: names.model,
            routes_file: names.routes,
            hash_file: names.hash,
        }
    }
}

impl ArtifactConfig {
    pub fn names(&self) -> ArtifactNames {
        ArtifactNames {
            model: self.model_file.clone(),
            routes: self.routes_file.clone(),
            hash: self.hash_file.clone(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("./data/Clean_Dataset.csv"),
            seed: 42,
            test_size: 0.2,
            route_ordering: RouteOrdering::FirstSeen,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_price: 1_000.0,
            max_price: 100_000.0,
            clamp_fallback: false,
        }
    }
}

impl PricingConfig {
    /// Bound a price to the band. Never panics; with an inverted band the
    /// upper bound wins.
    pub fn clamp(&self, price: f64) -> f64 {
        price.max(self.min_price).min(self.max_price)
    }

    /// Reject a band that is inverted or not finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_price.is_finite() && self.max_price.is_finite()) {
            return Err(PriceError::InvalidConfig(format!(
                "price band must be finite, got [{}, {}]",
                self.min_price, self.max_price
            )));
        }
        if self.min_price > self.max_price {
            return Err(PriceError::InvalidConfig(format!(
                "min_price {} exceeds max_price {}",
                self.min_price, self.max_price
            )));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PriceConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: PriceConfig = toml::from_str(&content)?;
        info!("Configuration loaded from: {}", path.display());
        Ok(config)
    }

    /// Apply `FLIGHT_PRICE_*` environment overrides.
    pub fn load_from_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ARTIFACT_DIR") {
            self.artifacts.directory = PathBuf::from(val);
        }
        if let Some(val) = lookup("DATASET_PATH") {
            self.training.dataset_path = PathBuf::from(val);
        }
        if let Some(val) = lookup("SEED") {
            self.training.seed = parse_override("SEED", &val)?;
        }
        if let Some(val) = lookup("TEST_SIZE") {
            self.training.test_size = parse_override("TEST_SIZE", &val)?;
        }
        if let Some(val) = lookup("ROUTE_ORDERING") {
            self.training.route_ordering = match val.as_str() {
                "first_seen" => RouteOrdering::FirstSeen,
                "lexicographic" => RouteOrdering::Lexicographic,
                other => {
                    return Err(PriceError::InvalidConfig(format!(
                        "{}ROUTE_ORDERING: unknown ordering `{}`",
                        ENV_PREFIX, other
                    )))
                }
            };
        }
        if let Some(val) = lookup("MIN_PRICE") {
            self.pricing.min_price = parse_override("MIN_PRICE", &val)?;
        }
        if let Some(val) = lookup("MAX_PRICE") {
            self.pricing.max_price = parse_override("MAX_PRICE", &val)?;
        }
        if let Some(val) = lookup("CLAMP_FALLBACK") {
            self.pricing.clamp_fallback = parse_override("CLAMP_FALLBACK", &val)?;
        }
        if let Some(val) = lookup("LOG_LEVEL") {
            self.logging.level = val;
        }
        Ok(())
    }

    /// Reject unusable values and return warnings for suspicious ones.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        self.pricing.validate()?;

        if !(self.training.test_size > 0.0 && self.training.test_size < 1.0) {
            return Err(PriceError::InvalidConfig(format!(
                "test_size must be in (0, 1), got {}",
                self.training.test_size
            )));
        }

        if self.pricing.min_price <= 0.0 {
            warnings.push("min_price is not positive, zero or negative prices can be returned".to_string());
        }

        if self.training.test_size > 0.5 {
            warnings.push("More than half of the dataset is held out from training".to_string());
        }

        if self.artifacts.model_file == self.artifacts.routes_file {
            warnings.push("Model and route vocabulary share a file name".to_string());
        }

        if warnings.is_empty() {
            info!("Configuration validation passed");
        } else {
            warn!("Configuration validation warnings: {:?}", warnings);
        }

        Ok(warnings)
    }

    /// Save configuration as TOML.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to: {}", path.display());
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        PriceError::InvalidConfig(format!("{}{}: cannot parse `{}`", ENV_PREFIX, key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_reference_service() {
        let config = PriceConfig::default();
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.training.test_size, 0.2);
        assert_eq!(config.pricing.min_price, 1_000.0);
        assert_eq!(config.pricing.max_price, 100_000.0);
        assert!(!config.pricing.clamp_fallback);
        assert_eq!(config.artifacts.names(), ArtifactNames::default());
    }

    #[test]
    fn test_default_config_validates() {
        let warnings = PriceConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let mut config = PriceConfig::default();
        config.pricing.min_price = 5_000.0;
        config.pricing.max_price = 10.0;
        assert!(matches!(config.validate(), Err(PriceError::InvalidConfig(_))));
    }

    #[test]
    fn test_clamp_never_panics_on_bad_band() {
        let inverted = PricingConfig {
            min_price: 5_000.0,
            max_price: 10.0,
            ..PricingConfig::default()
        };
        assert_eq!(inverted.clamp(3_000.0), 10.0);
        assert!(inverted.validate().is_err());

        let nan = PricingConfig {
            min_price: f64::NAN,
            ..PricingConfig::default()
        };
        assert_eq!(nan.clamp(500.0), 500.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SEED", "7"),
            ("ROUTE_ORDERING", "lexicographic"),
            ("CLAMP_FALLBACK", "true"),
            ("ARTIFACT_DIR", "/tmp/models"),
        ]
        .into_iter()
        .collect();

        let mut config = PriceConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.route_ordering, RouteOrdering::Lexicographic);
        assert!(config.pricing.clamp_fallback);
        assert_eq!(config.artifacts.directory, PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let mut config = PriceConfig::default();
        let err = config
            .apply_overrides(|key| (key == "MAX_PRICE").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, PriceError::InvalidConfig(_)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("price.toml");
        std::fs::write(&path, "[pricing]\nmax_price = 50000.0\n").unwrap();

        let config = PriceConfig::load_from_file(&path).unwrap();
        assert_eq!(config.pricing.max_price, 50_000.0);
        assert_eq!(config.pricing.min_price, 1_000.0);
        assert_eq!(config.training.seed, 42);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("price.toml");

        let mut config = PriceConfig::default();
        config.training.route_ordering = RouteOrdering::Lexicographic;
        config.save_to_file(&path).unwrap();

        let loaded = PriceConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
