//! Built-in model loader

use std::sync::Arc;

use tracing::info;

use super::{Engine, ModelLoader, RuleEngine, VibratoEngine};
use crate::config::DictionaryConfig;
use crate::errors::ModelError;
use crate::language::{LanguageCode, ModelId};

/// Loads the engines shipped with this crate.
///
/// - `ja`: [`VibratoEngine`] over the configured dictionary (preset download or
///   local file)
/// - everything else: [`RuleEngine`]
#[derive(Debug, Clone, Default)]
pub struct BuiltinModelLoader {
  dictionary: DictionaryConfig,
}

impl BuiltinModelLoader {
  /// Creates the loader with the dictionary settings for the Japanese model
  pub fn new(dictionary: DictionaryConfig) -> Self {
    Self { dictionary }
  }

  /// Dictionary settings used for the Japanese model
  pub fn dictionary(&self) -> &DictionaryConfig {
    &self.dictionary
  }
}

impl ModelLoader for BuiltinModelLoader {
  fn load(&self, model: ModelId) -> Result<Arc<dyn Engine>, ModelError> {
    match model.language() {
      LanguageCode::Ja => {
        let manager = self.dictionary.manager()?;
        info!(model = %model, manager = ?manager, "Loading dictionary for model");
        let dict = manager.load()?;
        Ok(Arc::new(VibratoEngine::from_shared_dictionary(model, dict)))
      }
      _ => Ok(Arc::new(RuleEngine::new(model))),
    }
  }
}
