//! Artifact persistence for the trained model and its route vocabulary
//!
//! The pair is stored as three named blobs:
//! - the model as canonical JSON,
//! - the route vocabulary as canonical JSON,
//! - a hex BLAKE3 hash of the model bytes.
//!
//! Where the bytes live is up to the [`ArtifactStore`] implementation.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use crate::errors::{PriceError, Result};
use crate::model::LinearModel;
use crate::routes::RouteVocabulary;
use crate::serialization::{artifact_hash, canonical_json_bytes};

/// Byte-level load/save of named artifacts.
pub trait ArtifactStore {
    /// Read an artifact. `Ok(None)` means it does not exist.
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Create or replace an artifact.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for &S {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(name)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        (**self).write(name, bytes)
    }
}

/// Artifacts stored as files in one directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    directory: PathBuf,
}

impl FsArtifactStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, name: &str) -> PathBuf {
        self.directory.join(name)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(name);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.directory)?;

        // Write-then-rename so readers never observe a half-written file.
        let path = self.path(name);
        let tmp = self.path(&format!(".{}.tmp", name));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// In-process artifact store
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `read` calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn remove(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.write().remove(name)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.blobs.read().get(name).cloned())
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.write().insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Blob names of the artifact pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    pub model: String,
    pub routes: String,
    pub hash: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            model: "model.json".to_string(),
            routes: "route_codes.json".to_string(),
            hash: "model.hash".to_string(),
        }
    }
}

/// Result of persisting an artifact pair
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub model_bytes: usize,
    pub routes_bytes: usize,
    pub model_hash: String,
}

/// The trained model together with the vocabulary it was fitted against
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub model: LinearModel,
    pub routes: RouteVocabulary,
}

impl ModelArtifacts {
    pub fn new(model: LinearModel, routes: RouteVocabulary) -> Self {
        Self { model, routes }
    }

    /// Persist model, vocabulary and model hash.
    pub fn save<S: ArtifactStore>(&self, store: &S, names: &ArtifactNames) -> Result<SaveReport> {
        self.model.validate()?;

        let model_bytes = canonical_json_bytes(&self.model)?;
        let routes_bytes = canonical_json_bytes(&self.routes)?;
        let model_hash = artifact_hash(&model_bytes);

        store.write(&names.model, &model_bytes)?;
        store.write(&names.routes, &routes_bytes)?;
        store.write(&names.hash, model_hash.as_bytes())?;

        info!(
            "Saved model artifacts ({} model bytes, {} routes, hash {})",
            model_bytes.len(),
            self.routes.len(),
            model_hash
        );

        Ok(SaveReport {
            model_bytes: model_bytes.len(),
            routes_bytes: routes_bytes.len(),
            model_hash,
        })
    }

    /// Load the artifact pair.
    ///
    /// Returns `Ok(None)` when no model has been saved. A model without a
    /// route file loads with an empty vocabulary. A hash file, when present,
    /// must match the model bytes.
    pub fn load<S: ArtifactStore>(store: &S, names: &ArtifactNames) -> Result<Option<Self>> {
        let Some(model_bytes) = store.read(&names.model)? else {
            return Ok(None);
        };

        if let Some(expected) = store.read(&names.hash)? {
            let expected = String::from_utf8_lossy(&expected).trim().to_string();
            let actual = artifact_hash(&model_bytes);
            if expected != actual {
                return Err(PriceError::ArtifactIntegrity(format!(
                    "model hash mismatch: expected {}, computed {}",
                    expected, actual
                )));
            }
        }

        let model: LinearModel = serde_json::from_slice(&model_bytes)?;
        model
            .validate()
            .map_err(|e| PriceError::ArtifactIntegrity(e.to_string()))?;

        let routes = match store.read(&names.routes)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => {
                warn!("Route vocabulary {} missing, route codes default to 0", names.routes);
                RouteVocabulary::default()
            }
        };

        Ok(Some(Self { model, routes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;
    use crate::model::ModelMetadata;
    use crate::routes::RouteOrdering;
    use tempfile::tempdir;

    fn sample_artifacts() -> ModelArtifacts {
        let model = LinearModel::new(
            [10.0, -5.0, 300.0, -20.0, 40_000.0, 1.0, 2.0, 3.0],
            2_500.0,
            ModelMetadata {
                training_rows: 100,
                seed: 42,
            },
        );
        let routes = RouteVocabulary::build(["Delhi_Mumbai", "Mumbai_Delhi"], RouteOrdering::FirstSeen);
        ModelArtifacts::new(model, routes)
    }

    #[test]
    fn test_missing_model_is_none() {
        let store = MemoryArtifactStore::new();
        let loaded = ModelArtifacts::load(&store, &ArtifactNames::default()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_from_directory() {
        let dir = tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().join("models"));
        let names = ArtifactNames::default();
        let artifacts = sample_artifacts();

        let report = artifacts.save(&store, &names).unwrap();
        assert_eq!(report.model_hash.len(), 64);
        assert!(dir.path().join("models/model.json").exists());
        assert!(dir.path().join("models/route_codes.json").exists());

        let loaded = ModelArtifacts::load(&store, &names).unwrap().unwrap();
        assert_eq!(loaded, artifacts);
    }

    #[test]
    fn test_saved_bytes_are_reproducible() {
        let names = ArtifactNames::default();
        let a = MemoryArtifactStore::new();
        let b = MemoryArtifactStore::new();

        let ra = sample_artifacts().save(&a, &names).unwrap();
        let rb = sample_artifacts().save(&b, &names).unwrap();
        assert_eq!(ra.model_hash, rb.model_hash);
        assert_eq!(a.read("route_codes.json").unwrap(), b.read("route_codes.json").unwrap());
    }

    #[test]
    fn test_tampered_model_is_rejected() {
        let store = MemoryArtifactStore::new();
        let names = ArtifactNames::default();
        sample_artifacts().save(&store, &names).unwrap();

        let mut model = sample_artifacts().model;
        model.intercept = 1.0;
        store
            .write(&names.model, &canonical_json_bytes(&model).unwrap())
            .unwrap();

        let err = ModelArtifacts::load(&store, &names).unwrap_err();
        assert!(matches!(err, PriceError::ArtifactIntegrity(_)));
    }

    #[test]
    fn test_model_without_routes_loads_empty_vocabulary() {
        let store = MemoryArtifactStore::new();
        let names = ArtifactNames::default();
        sample_artifacts().save(&store, &names).unwrap();
        store.remove(&names.routes);

        let loaded = ModelArtifacts::load(&store, &names).unwrap().unwrap();
        assert!(loaded.routes.is_empty());
        assert_eq!(loaded.model.coefficients.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_wrong_width_model_is_rejected() {
        let store = MemoryArtifactStore::new();
        let names = ArtifactNames::default();
        let mut model = sample_artifacts().model;
        model.coefficients.truncate(3);
        store
            .write(&names.model, &serde_json::to_vec(&model).unwrap())
            .unwrap();

        let err = ModelArtifacts::load(&store, &names).unwrap_err();
        assert!(matches!(err, PriceError::ArtifactIntegrity(_)));
    }
}
