//! Price inference service
//!
//! [`PricePredictor`] owns an artifact store and loads the trained model pair
//! from it on the first prediction. A successful load happens at most once per
//! predictor: concurrent first callers block on the same initialization
//! instead of each reading the store. When no model has been trained, or the
//! stored one is unusable, the query is answered by the fallback heuristic and
//! the next query checks the store again.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::artifacts::{ArtifactNames, ArtifactStore, ModelArtifacts};
use crate::config::PricingConfig;
use crate::fallback::{self, round_to_cents};
use crate::features::{extract_features, FlightQuery};
use crate::model::MODEL_KIND;

/// Which estimator produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    LinearRegression,
    Fallback,
}

impl EstimateSource {
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateSource::LinearRegression => MODEL_KIND,
            EstimateSource::Fallback => "fallback",
        }
    }
}

/// A priced query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub price: f64,
    pub source: EstimateSource,
}

/// Lazily loaded model service
pub struct PricePredictor<S> {
    store: S,
    names: ArtifactNames,
    pricing: PricingConfig,
    loaded: OnceCell<Arc<ModelArtifacts>>,
    /// Set once a missing or unusable model has been logged
    miss_reported: AtomicBool,
}

impl<S: ArtifactStore> PricePredictor<S> {
    pub fn new(store: S, names: ArtifactNames, pricing: PricingConfig) -> Self {
        Self {
            store,
            names,
            pricing,
            loaded: OnceCell::new(),
            miss_reported: AtomicBool::new(false),
        }
    }

    /// Predictor that serves pre-loaded artifacts without touching the store.
    pub fn with_artifacts(store: S, artifacts: ModelArtifacts, pricing: PricingConfig) -> Self {
        let loaded = OnceCell::new();
        let _ = loaded.set(Arc::new(artifacts));
        Self {
            store,
            names: ArtifactNames::default(),
            pricing,
            loaded,
            miss_reported: AtomicBool::new(false),
        }
    }

    /// Price a query.
    pub fn predict(&self, query: &FlightQuery) -> PriceEstimate {
        match self.artifacts() {
            Some(artifacts) => {
                let features = extract_features(query, Some(&artifacts.routes));
                let raw = artifacts.model.predict(&features);
                let price = round_to_cents(self.pricing.clamp(raw));
                debug!(raw, price, route = %query.route_key(), "Model estimate");
                PriceEstimate {
                    price,
                    source: EstimateSource::LinearRegression,
                }
            }
            None => {
                let mut price = fallback::estimate(query.duration, query.days_left, query.stops, query.cabin);
                if self.pricing.clamp_fallback {
                    price = round_to_cents(self.pricing.clamp(price));
                }
                debug!(price, "Fallback estimate");
                PriceEstimate {
                    price,
                    source: EstimateSource::Fallback,
                }
            }
        }
    }

    /// Price a query, returning only the amount.
    pub fn predict_price(&self, query: &FlightQuery) -> f64 {
        self.predict(query).price
    }

    /// Whether a trained model is active. Triggers the lazy load.
    pub fn is_model_loaded(&self) -> bool {
        self.artifacts().is_some()
    }

    /// Loaded artifact pair, if any. Retries the store while nothing is loaded.
    pub fn artifacts(&self) -> Option<&ModelArtifacts> {
        self.loaded
            .get_or_try_init(|| self.load().ok_or(()))
            .ok()
            .map(|artifacts| artifacts.as_ref())
    }

    /// Drop the cached pair; the next prediction reloads from the store.
    pub fn invalidate(&mut self) {
        if self.loaded.take().is_some() {
            info!("Model artifacts invalidated");
        }
        *self.miss_reported.get_mut() = false;
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    fn load(&self) -> Option<Arc<ModelArtifacts>> {
        match ModelArtifacts::load(&self.store, &self.names) {
            Ok(Some(artifacts)) => {
                info!(
                    "Model loaded ({} routes, trained on {} rows)",
                    artifacts.routes.len(),
                    artifacts.model.metadata.training_rows
                );
                self.miss_reported.store(false, Ordering::Relaxed);
                Some(Arc::new(artifacts))
            }
            Ok(None) => {
                if self.miss_reported.swap(true, Ordering::Relaxed) {
                    debug!("Still no trained model, using fallback pricing");
                } else {
                    warn!("No trained model found, using fallback pricing");
                }
                None
            }
            Err(err) => {
                if self.miss_reported.swap(true, Ordering::Relaxed) {
                    debug!("Model artifacts still unusable: {}", err);
                } else {
                    error!("Failed to load model artifacts, using fallback pricing: {}", err);
                }
                None
            }
        }
    }
}
