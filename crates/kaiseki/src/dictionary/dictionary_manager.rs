//! Dictionary Management Module
//!
//! Resolves where the vibrato-rkyv dictionary for the Japanese model comes from
//! and loads it. Preset dictionaries (IPADIC, UniDic) are downloaded into the
//! cache directory on the first run and loaded from there afterwards. A local
//! dictionary file can be used instead.
//!
//! The manager does not memoize the loaded dictionary. The model registry keeps
//! the engine built from it, and a failed load must stay retryable.

use crate::errors::error_definition::DictionaryError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use vibrato_rkyv::Dictionary;
use vibrato_rkyv::dictionary::LoadMode;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

/// Dictionary manager structure for vibrato-rkyv
#[derive(Debug, Clone)]
pub struct DictionaryManager {
  /// Dictionary cache directory
  cache_dir: PathBuf,

  /// Type of preset dictionary `Ipadic`, `UnidicCwj`, `UnidicCsj`, etc.
  /// Should be `None` for local dictionaries
  preset_kind: Option<PresetDictionaryKind>,

  /// Dictionary file path (only for local dictionaries)
  dictionary_path: Option<PathBuf>,
}

impl DictionaryManager {
  /// Returns the path of the cache directory
  pub fn cache_dir(&self) -> &Path {
    &self.cache_dir
  }

  /// Returns the preset kind (`None` for local dictionaries)
  pub fn preset_kind(&self) -> Option<PresetDictionaryKind> {
    self.preset_kind
  }

  /// Constructor using a preset dictionary
  ///
  /// `cache_dir` defaults to [`default_cache_dir`] when `None`.
  pub fn with_preset(
    preset_kind: PresetDictionaryKind,
    cache_dir: Option<&Path>,
  ) -> Result<Self, DictionaryError> {
    let cache_dir = match cache_dir {
      Some(dir) => dir.to_path_buf(),
      None => default_cache_dir()?,
    };

    Ok(Self {
      cache_dir,
      preset_kind: Some(preset_kind),
      dictionary_path: None,
    })
  }

  /// Constructor using a local dictionary file
  pub fn from_local_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
      let s = path.display().to_string();
      return Err(DictionaryError::DictionaryNotFound(s));
    }

    let cache_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

    Ok(Self {
      cache_dir,
      preset_kind: None,
      dictionary_path: Some(path),
    })
  }

  /// Loads the dictionary
  ///
  /// Every call reads (and on the first run for a preset, downloads) the
  /// dictionary. This may take seconds.
  pub fn load(&self) -> Result<Arc<Dictionary>, DictionaryError> {
    let dict = match (&self.dictionary_path, self.preset_kind) {
      (Some(path), _) => Self::load_from_local_path(path)?,
      (None, Some(preset_kind)) => self.load_from_preset(preset_kind)?,
      _ => {
        return Err(DictionaryError::InvalidPathOrInvalidPresetKind(
          self.cache_dir.clone(),
          self.preset_kind,
        ));
      }
    };
    Ok(Arc::new(dict))
  }

  fn load_from_local_path(path: &Path) -> Result<Dictionary, DictionaryError> {
    info!(path = %path.display(), "Loading local dictionary");
    Dictionary::from_path(path, LoadMode::TrustCache)
      .map_err(|e| DictionaryError::VibratoLoad(Arc::new(e)))
  }

  /// Downloads the preset on the first run, loads it from the cache afterwards
  fn load_from_preset(
    &self,
    preset_kind: PresetDictionaryKind,
  ) -> Result<Dictionary, DictionaryError> {
    std::fs::create_dir_all(&self.cache_dir)
      .map_err(|e| DictionaryError::CacheDirCreationFailed(Arc::new(e)))?;

    let dict_dir = self.cache_dir.join(preset_kind.name());
    info!(preset = preset_kind.name(), dir = %dict_dir.display(), "Loading preset dictionary");

    Dictionary::from_preset_with_download(preset_kind, &dict_dir)
      .map_err(|e| DictionaryError::PresetDictDownloadFailed(Arc::new(e)))
  }
}

/// Returns the default cache directory path according to the OS
///
/// | OS      | Example Path                                 |
/// |---------|----------------------------------------------|
/// | Linux   | `~/.cache/kaiseki/dict`                      |
/// | macOS   | `~/Library/Caches/kaiseki/dict`              |
/// | Windows | `C:\Users\{user}\AppData\Local\kaiseki\dict` |
pub fn default_cache_dir() -> Result<PathBuf, DictionaryError> {
  let base = dirs::cache_dir().ok_or(DictionaryError::CacheDirNotFound)?;

  Ok(base.join("kaiseki").join("dict"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn with_preset_uses_given_cache_dir() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let manager =
      DictionaryManager::with_preset(PresetDictionaryKind::Ipadic, Some(temp_dir.path())).unwrap();
    assert_eq!(manager.cache_dir(), temp_dir.path());
    assert_eq!(manager.preset_kind(), Some(PresetDictionaryKind::Ipadic));
  }

  #[test]
  fn from_local_path_with_nonexistent_file() {
    let err = DictionaryManager::from_local_path("/nonexistent/path/to/system.dic").unwrap_err();
    assert!(matches!(err, DictionaryError::DictionaryNotFound(_)), "{err:?}");
  }

  #[test]
  fn from_local_path_uses_parent_as_cache_dir() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("system.dic");
    std::fs::write(&path, b"not a dictionary").unwrap();

    let manager = DictionaryManager::from_local_path(&path).unwrap();
    assert_eq!(manager.cache_dir(), temp_dir.path());
    assert_eq!(manager.preset_kind(), None);
  }
}
