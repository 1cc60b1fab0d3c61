// crates/kaiseki/src/config.rs

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use crate::dictionary::DictionaryManager;
use crate::errors::{ConfigError, DictionaryError};

/// Preset dictionary type.
///
/// `PresetDictionaryKind` from vibrato-rkyv implements neither `Deserialize` nor
/// `FromStr`, and the orphan rule keeps us from adding them. This enum is the
/// configuration-side type, converted with `.into()` where the dictionary is
/// actually loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictionaryPreset {
  /// IpaDic: The smallest
  Ipadic,
  /// Unidic for written language
  UnidicCwj,
  /// Unidic for spoken language
  UnidicCsj,
}

impl DictionaryPreset {
  /// Name used on the command line and in environment variables
  pub fn as_str(&self) -> &'static str {
    match self {
      DictionaryPreset::Ipadic => "ipadic",
      DictionaryPreset::UnidicCwj => "unidic-cwj",
      DictionaryPreset::UnidicCsj => "unidic-csj",
    }
  }
}

impl FromStr for DictionaryPreset {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "ipadic" => Ok(Self::Ipadic),
      "unidic-cwj" => Ok(Self::UnidicCwj),
      "unidic-csj" => Ok(Self::UnidicCsj),
      _ => Err(ConfigError::UnknownPreset(s.to_string())),
    }
  }
}

impl std::fmt::Display for DictionaryPreset {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<DictionaryPreset> for PresetDictionaryKind {
  fn from(preset: DictionaryPreset) -> Self {
    match preset {
      DictionaryPreset::Ipadic => PresetDictionaryKind::Ipadic,
      DictionaryPreset::UnidicCwj => PresetDictionaryKind::UnidicCwj,
      DictionaryPreset::UnidicCsj => PresetDictionaryKind::UnidicCsj,
    }
  }
}

/// Dictionary configuration for the Japanese model.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryConfig {
  /// Preset dictionary type: "ipadic" | "unidic-cwj" | "unidic-csj"
  pub preset: DictionaryPreset,
  /// Dictionary cache directory.
  ///
  /// `None` falls back to the OS cache directory chosen by `DictionaryManager`.
  #[serde(default)]
  pub cache_dir: Option<PathBuf>,
  /// Local dictionary file. Takes precedence over `preset` when set.
  #[serde(default)]
  pub path: Option<PathBuf>,
}

impl Default for DictionaryConfig {
  fn default() -> Self {
    Self {
      preset: DictionaryPreset::UnidicCwj,
      cache_dir: None,
      path: None,
    }
  }
}

impl DictionaryConfig {
  /// Returns the preset dictionary type to pass to `DictionaryManager`.
  pub fn dictionary_preset(&self) -> PresetDictionaryKind {
    self.preset.into()
  }

  /// Returns the configured dictionary cache directory.
  pub fn cache_dir(&self) -> Option<&Path> {
    self.cache_dir.as_deref()
  }

  /// Builds the `DictionaryManager` described by this configuration.
  ///
  /// Nothing is downloaded or read here; that happens on `load()`.
  pub fn manager(&self) -> Result<DictionaryManager, DictionaryError> {
    match &self.path {
      Some(path) => DictionaryManager::from_local_path(path),
      None => DictionaryManager::with_preset(self.dictionary_preset(), self.cache_dir()),
    }
  }

  /// Validates the configuration.
  ///
  /// # Validation Items
  /// - `path`, if set, is an existing file
  /// - `cache_dir`, if set, exists as a directory or can be created
  ///
  /// # Errors
  /// Returns the corresponding `ConfigError` if validation fails.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(path) = &self.path {
      if !path.is_file() {
        return Err(ConfigError::DictionaryFileNotFound { path: path.clone() });
      }
    }

    if let Some(cache_dir) = &self.cache_dir {
      if cache_dir.exists() {
        if !cache_dir.is_dir() {
          return Err(ConfigError::InvalidDictionaryCacheDir {
            path: cache_dir.clone(),
          });
        }
      } else if let Err(e) = std::fs::create_dir_all(cache_dir) {
        return Err(ConfigError::DictionaryCacheDirCreationFailed {
          path: cache_dir.clone(),
          source: Arc::new(e),
        });
      }
    }

    Ok(())
  }
}

/// Model registry configuration.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
  /// Upper bound on how long a caller waits for a model load. The load itself
  /// keeps running past it. `None` waits indefinitely.
  pub load_timeout: Option<Duration>,
  /// Also accept full model names (e.g. `en_core_web_trf`) where a language
  /// code is expected.
  pub accept_model_names: bool,
}
