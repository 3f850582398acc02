//! Model module
//!
//! The classifier is trained elsewhere; this crate only evaluates it.
//!
//! - [`Classifier`]: the batch-predict contract every model honours
//! - [`forest`]: multi-output random forest loaded from a JSON artifact
//! - [`handle`]: the process-wide, load-once model handle

pub mod forest;
pub mod handle;

pub use forest::{ForestModel, OutputForest, Tree, TreeNode};
pub use handle::{load_model, shared, ModelHandle};

use ndarray::{Array2, ArrayView2};

use crate::utils::error::Result;

/// A single predicted label, as emitted by the model
pub type Label = f64;

/// Label value that means "sprinkler ON". Anything else is OFF.
pub const ON_LABEL: Label = 1.0;

/// Batch classifier: `Matrix[rows, input_width] -> Matrix[rows, output_width]`
pub trait Classifier: Send + Sync {
    /// Number of features expected per row
    fn input_width(&self) -> usize;

    /// Number of labels produced per row (one per sprinkler)
    fn output_width(&self) -> usize;

    /// Predict labels for every row of `batch`
    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Array2<Label>>;

    /// Short human-readable description for logs and the dashboard
    fn describe(&self) -> String {
        format!(
            "classifier ({} inputs -> {} outputs)",
            self.input_width(),
            self.output_width()
        )
    }
}
