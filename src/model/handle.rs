//! Model handle
//!
//! The classifier is loaded once per process and shared read-only by every
//! request. A failed load is not fatal: the handle records the failure so the
//! dashboard can report it and refuse predictions while everything else keeps
//! working.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{error, info};

use super::{Classifier, ForestModel};
use crate::utils::error::{IrrigationError, Result};

/// Either a ready classifier or the reason it could not be loaded
#[derive(Clone)]
pub enum ModelHandle {
    Ready(Arc<dyn Classifier>),
    Unavailable { path: PathBuf, reason: String },
}

impl ModelHandle {
    /// Wrap an already constructed classifier
    pub fn ready<C: Classifier + 'static>(classifier: C) -> Self {
        ModelHandle::Ready(Arc::new(classifier))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelHandle::Ready(_))
    }

    /// The classifier, or `ModelUnavailable` if loading failed
    pub fn classifier(&self) -> Result<&dyn Classifier> {
        match self {
            ModelHandle::Ready(c) => Ok(c.as_ref()),
            ModelHandle::Unavailable { path, reason } => Err(IrrigationError::ModelUnavailable(
                format!("could not load '{}': {}", path.display(), reason),
            )),
        }
    }

    /// The load failure, if any, as a displayable error
    pub fn load_error(&self) -> Option<IrrigationError> {
        match self {
            ModelHandle::Ready(_) => None,
            ModelHandle::Unavailable { path, reason } => Some(IrrigationError::ModelLoad {
                path: path.clone(),
                reason: reason.clone(),
            }),
        }
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelHandle::Ready(c) => f.debug_tuple("Ready").field(&c.describe()).finish(),
            ModelHandle::Unavailable { path, reason } => f
                .debug_struct("Unavailable")
                .field("path", path)
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Load the forest artifact at `path`. Never panics; failures are captured
/// in the returned handle and logged.
pub fn load_model(path: impl AsRef<Path>) -> ModelHandle {
    let path = path.as_ref();
    let start = Instant::now();

    match ForestModel::load(path) {
        Ok(model) => {
            info!(
                "Loaded {} from {:?} in {:.1}ms",
                model.describe(),
                path,
                start.elapsed().as_secs_f64() * 1000.0
            );
            ModelHandle::ready(model)
        }
        Err(e) => {
            error!("Could not load model {:?}: {}", path, e);
            ModelHandle::Unavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    }
}

static SHARED_MODEL: OnceLock<ModelHandle> = OnceLock::new();

/// Process-wide model handle.
///
/// The first call loads from `path`; later calls return the cached handle and
/// ignore their argument. There is no reload.
pub fn shared(path: impl AsRef<Path>) -> &'static ModelHandle {
    SHARED_MODEL.get_or_init(|| load_model(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OutputForest, Tree, TreeNode};
    use tempfile::TempDir;

    fn constant_model(n_outputs: usize) -> ForestModel {
        ForestModel {
            n_features: 20,
            outputs: (0..n_outputs)
                .map(|_| OutputForest {
                    classes: vec![0.0, 1.0],
                    trees: vec![Tree {
                        nodes: vec![TreeNode::Leaf {
                            value: vec![0.0, 1.0],
                        }],
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let handle = load_model("/definitely/not/here/Farm_Irrigation_System.json");
        assert!(!handle.is_ready());
        assert!(matches!(
            handle.classifier(),
            Err(IrrigationError::ModelUnavailable(_))
        ));
        assert!(handle
            .load_error()
            .unwrap()
            .to_string()
            .contains("Farm_Irrigation_System.json"));
    }

    #[test]
    fn test_load_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        constant_model(20).save(&path).unwrap();

        let handle = load_model(&path);
        assert!(handle.is_ready());
        assert!(handle.load_error().is_none());

        let classifier = handle.classifier().unwrap();
        assert_eq!(classifier.input_width(), 20);
        assert_eq!(classifier.output_width(), 20);
    }

    #[test]
    fn test_corrupt_file_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");
        std::fs::write(&path, "{\"n_features\": 20}").unwrap();

        let handle = load_model(&path);
        assert!(!handle.is_ready());
        assert!(format!("{:?}", handle).contains("Unavailable"));
    }

    #[test]
    fn test_shipped_artifact_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(crate::DEFAULT_MODEL_FILE);
        let handle = load_model(&path);
        let classifier = handle.classifier().unwrap();

        assert_eq!(classifier.input_width(), crate::SENSOR_COUNT);
        assert_eq!(classifier.output_width(), 20);

        for level in [0.0, 0.5, 1.0] {
            let batch = ndarray::Array2::from_elem((1, 20), level);
            let out = classifier.predict(batch.view()).unwrap();
            assert!(out.iter().all(|&l| l == 0.0 || l == 1.0));
        }
    }

    #[test]
    fn test_shared_is_loaded_once() {
        let first = shared("/missing/first.json");
        let second = shared("/missing/second.json");
        assert!(std::ptr::eq(first, second));
    }
}
