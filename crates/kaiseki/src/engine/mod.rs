//! engine module
//!
//! The capability seam between the registry and the actual analysis backends.
//! The registry only knows [`ModelLoader`] and [`Engine`]; any implementation
//! (the built-in ones here, or a stub in tests) can be plugged in.

pub mod loader;
pub mod rule_engine;
pub mod vibrato_engine;

use std::sync::Arc;

use crate::errors::ModelError;
use crate::language::ModelId;
use crate::models::Document;

/// A loaded model that turns text into a [`Document`].
///
/// `analyze` takes `&self` and may be called from many threads at once.
pub trait Engine: Send + Sync {
  /// Identifier of the model this engine was loaded for
  fn model_id(&self) -> ModelId;

  /// Analyzes one text
  ///
  /// # Errors
  /// `ModelError::InvalidInput` / `ModelError::AnalysisFailed` when the text
  /// cannot be processed. The engine stays usable afterwards.
  fn analyze(&self, text: &str) -> Result<Document, ModelError>;
}

/// Constructs engines. Called at most once per model at a time by the registry.
///
/// Loading may block for a long time (downloads, large files); the registry
/// runs it on the blocking thread pool.
pub trait ModelLoader: Send + Sync {
  /// Loads the engine for `model`
  ///
  /// # Errors
  /// Any `ModelError` describing why the model could not be loaded.
  fn load(&self, model: ModelId) -> Result<Arc<dyn Engine>, ModelError>;
}

impl<F> ModelLoader for F
where
  F: Fn(ModelId) -> Result<Arc<dyn Engine>, ModelError> + Send + Sync,
{
  fn load(&self, model: ModelId) -> Result<Arc<dyn Engine>, ModelError> {
    self(model)
  }
}

/// Rejects text no engine can process (NUL characters).
///
/// # Errors
/// `ModelError::AnalysisFailed` naming the first offending character offset.
pub fn check_input(model: ModelId, text: &str) -> Result<(), ModelError> {
  match text.chars().position(|c| c == '\0') {
    Some(offset) => Err(ModelError::AnalysisFailed {
      model,
      reason: format!("text contains a NUL character at offset {offset}"),
    }),
    None => Ok(()),
  }
}

/// 再エクスポート
pub use loader::BuiltinModelLoader;
pub use rule_engine::RuleEngine;
pub use vibrato_engine::VibratoEngine;
