// crates/kaiseki/src/language.rs

//! Language codes and the static language → model table.
//!
//! The table is fixed at compile time. Every [`LanguageCode`] has exactly one
//! [`ModelId`]; anything outside the enum is rejected when parsing.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::{ConfigError, RegistryError};

/// Supported language codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LanguageCode {
  /// Chinese
  Zh,
  /// Catalan
  Ca,
  /// Danish
  Da,
  /// Dutch
  Nl,
  /// English
  En,
  /// French
  Fr,
  /// German
  De,
  /// Greek
  El,
  /// Italian
  It,
  /// Japanese (Morphological Analysis: vibrato)
  Ja,
  /// Lithuanian
  Lt,
  /// Macedonian
  Mk,
  /// Multi-language
  Xx,
  /// Norwegian Bokmål
  Nb,
  /// Polish
  Pl,
  /// Portuguese
  Pt,
  /// Romanian
  Ro,
  /// Russian
  Ru,
  /// Spanish
  Es,
}

impl LanguageCode {
  /// All supported codes, in table order.
  pub const ALL: [LanguageCode; 19] = [
    LanguageCode::Zh,
    LanguageCode::Ca,
    LanguageCode::Da,
    LanguageCode::Nl,
    LanguageCode::En,
    LanguageCode::Fr,
    LanguageCode::De,
    LanguageCode::El,
    LanguageCode::It,
    LanguageCode::Ja,
    LanguageCode::Lt,
    LanguageCode::Mk,
    LanguageCode::Xx,
    LanguageCode::Nb,
    LanguageCode::Pl,
    LanguageCode::Pt,
    LanguageCode::Ro,
    LanguageCode::Ru,
    LanguageCode::Es,
  ];

  /// Returns the short code (e.g. `"en"`).
  pub fn code(&self) -> &'static str {
    match self {
      LanguageCode::Zh => "zh",
      LanguageCode::Ca => "ca",
      LanguageCode::Da => "da",
      LanguageCode::Nl => "nl",
      LanguageCode::En => "en",
      LanguageCode::Fr => "fr",
      LanguageCode::De => "de",
      LanguageCode::El => "el",
      LanguageCode::It => "it",
      LanguageCode::Ja => "ja",
      LanguageCode::Lt => "lt",
      LanguageCode::Mk => "mk",
      LanguageCode::Xx => "xx",
      LanguageCode::Nb => "nb",
      LanguageCode::Pl => "pl",
      LanguageCode::Pt => "pt",
      LanguageCode::Ro => "ro",
      LanguageCode::Ru => "ru",
      LanguageCode::Es => "es",
    }
  }

  /// Returns the English name of the language.
  pub fn name(&self) -> &'static str {
    match self {
      LanguageCode::Zh => "Chinese",
      LanguageCode::Ca => "Catalan",
      LanguageCode::Da => "Danish",
      LanguageCode::Nl => "Dutch",
      LanguageCode::En => "English",
      LanguageCode::Fr => "French",
      LanguageCode::De => "German",
      LanguageCode::El => "Greek",
      LanguageCode::It => "Italian",
      LanguageCode::Ja => "Japanese",
      LanguageCode::Lt => "Lithuanian",
      LanguageCode::Mk => "Macedonian",
      LanguageCode::Xx => "MultiLanguage",
      LanguageCode::Nb => "NorwegianBokmål",
      LanguageCode::Pl => "Polish",
      LanguageCode::Pt => "Portuguese",
      LanguageCode::Ro => "Romanian",
      LanguageCode::Ru => "Russian",
      LanguageCode::Es => "Spanish",
    }
  }

  /// Returns the model identifier loaded for this language.
  pub fn model_id(&self) -> ModelId {
    ModelId(*self)
  }
}

impl fmt::Display for LanguageCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.code())
  }
}

impl FromStr for LanguageCode {
  type Err = RegistryError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    LanguageCode::ALL.iter().copied().find(|lang| lang.code() == s).ok_or_else(|| {
      RegistryError::UnknownLanguage {
        code: s.to_string(),
        supported: supported_languages_description(),
      }
    })
  }
}

/// Identifier of a loadable model (e.g. `en_core_web_trf`).
///
/// Only constructible from the table, so every `ModelId` is a valid key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(LanguageCode);

impl ModelId {
  /// Returns the model name.
  pub fn name(&self) -> &'static str {
    match self.0 {
      LanguageCode::Zh => "zh_core_web_trf",
      LanguageCode::Ca => "ca_core_news_trf",
      LanguageCode::Da => "da_core_news_trf",
      LanguageCode::Nl => "nl_core_news_lg",
      LanguageCode::En => "en_core_web_trf",
      LanguageCode::Fr => "fr_dep_news_trf",
      LanguageCode::De => "de_dep_news_trf",
      LanguageCode::El => "el_core_news_lg",
      LanguageCode::It => "it_core_news_lg",
      LanguageCode::Ja => "ja_core_news_trf",
      LanguageCode::Lt => "lt_core_news_lg",
      LanguageCode::Mk => "mk_core_news_lg",
      LanguageCode::Xx => "xx_sent_ud_sm",
      LanguageCode::Nb => "nb_core_news_lg",
      LanguageCode::Pl => "pl_core_news_lg",
      LanguageCode::Pt => "pt_core_news_lg",
      LanguageCode::Ro => "ro_core_news_lg",
      LanguageCode::Ru => "ru_core_news_lg",
      LanguageCode::Es => "es_dep_news_trf",
    }
  }

  /// Returns the language this model analyzes.
  pub fn language(&self) -> LanguageCode {
    self.0
  }

  /// Reverse lookup by model name.
  pub fn from_name(name: &str) -> Option<ModelId> {
    LanguageCode::ALL.iter().map(LanguageCode::model_id).find(|model| model.name() == name)
  }
}

impl fmt::Display for ModelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// Logs and error messages read better with the bare name than `ModelId(En)`.
impl fmt::Debug for ModelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl Serialize for ModelId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.name())
  }
}

/// Checks the language table at startup.
///
/// # Errors
/// - a model name is empty
/// - two languages share a model name
/// - a model name does not reverse-resolve to its language
pub fn validate_model_table() -> Result<(), ConfigError> {
  let mut seen: HashMap<&'static str, LanguageCode> = HashMap::new();

  for lang in LanguageCode::ALL {
    let model = lang.model_id();
    if model.name().is_empty() {
      return Err(ConfigError::EmptyModelId {
        language: lang.code().to_string(),
      });
    }
    if let Some(first) = seen.insert(model.name(), lang) {
      return Err(ConfigError::DuplicateModelId {
        model: model.name().to_string(),
        first: first.code().to_string(),
        second: lang.code().to_string(),
      });
    }
    if ModelId::from_name(model.name()).map(|m| m.language()) != Some(lang) {
      return Err(ConfigError::ModelTableMismatch {
        model: model.name().to_string(),
        expected: lang.code().to_string(),
      });
    }
  }

  Ok(())
}

/// Human-readable list of supported codes: `'zh' (Chinese), 'ca' (Catalan), ...`
pub fn supported_languages_description() -> String {
  LanguageCode::ALL
    .iter()
    .map(|lang| format!("'{}' ({})", lang.code(), lang.name()))
    .collect::<Vec<_>>()
    .join(", ")
}
