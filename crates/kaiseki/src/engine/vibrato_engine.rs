//! Japanese engine using vibrato-rkyv

use std::sync::Arc;
use tracing::debug;
use vibrato_rkyv::Dictionary;
use vibrato_rkyv::Tokenizer as VibratoImpl;

use super::{Engine, check_input};
use crate::errors::ModelError;
use crate::language::ModelId;
use crate::models::{Document, Token};

/// Constants for feature array indices
///
/// Position of each field in the feature array of MeCab/IPAdic dictionary format
const IDX_LEMMA: usize = 6;
const IDX_READING: usize = 7;

/// Number of POS fields at the head of the feature
const POS_FIELDS: usize = 4;

/// vibrato cannot take a sentence longer than this (in characters)
pub const MAX_LINE_CHARS: usize = u16::MAX as usize;

/// Japanese engine using vibrato-rkyv
///
/// - Holds only the shared dictionary; a worker is created per call
/// - `Send + Sync`, so one instance serves concurrent requests
#[derive(Clone)]
pub struct VibratoEngine {
  model: ModelId,
  inner: VibratoImpl,
}

impl VibratoEngine {
  /// Constructs the engine from a shared dictionary (`Arc<Dictionary>`).
  ///
  /// Use this with `DictionaryManager::load()`.
  pub fn from_shared_dictionary(model: ModelId, dict: Arc<Dictionary>) -> Self {
    Self {
      model,
      inner: VibratoImpl::from_shared_dictionary(dict),
    }
  }
}

impl Engine for VibratoEngine {
  fn model_id(&self) -> ModelId {
    self.model
  }

  /// Analyzes the text line by line.
  ///
  /// Whitespace tokens are dropped. Offsets are characters in the whole text.
  fn analyze(&self, text: &str) -> Result<Document, ModelError> {
    check_input(self.model, text)?;
    let mut worker = self.inner.new_worker();
    let mut tokens: Vec<Token> = Vec::new();
    let mut line_offset = 0;

    for line in text.split('\n') {
      let line_chars = line.chars().count();
      if line_chars > MAX_LINE_CHARS {
        return Err(ModelError::InvalidInput {
          reason: format!("line has {line_chars} characters (max: {MAX_LINE_CHARS})"),
        });
      }

      if !line.trim().is_empty() {
        worker.reset_sentence(line);
        worker.tokenize();

        for token in worker.token_iter() {
          let surface = token.surface();
          if surface.trim().is_empty() {
            continue;
          }
          let range = token.range_char();

          debug!(surface = %surface, feature = %token.feature(), start = range.start, "Token");

          tokens.push(token_from_feature(
            tokens.len(),
            surface,
            token.feature(),
            line_offset + range.start,
            line_offset + range.end,
          ));
        }
      }

      // +1 for the '\n' consumed by split
      line_offset += line_chars + 1;
    }

    debug!(
      model = %self.model,
      text_len = text.len(),
      token_count = tokens.len(),
      "Morphological analysis completed"
    );

    Ok(Document::new(self.model, text, tokens))
  }
}

/// Builds a document token from a vibrato surface/feature pair.
///
/// Lemma and reading are taken from the feature columns when present
/// (`*` or missing means unknown).
pub fn token_from_feature(
  id: usize,
  surface: &str,
  feature: &str,
  start: usize,
  end: usize,
) -> Token {
  let parts: Vec<&str> = feature.split(',').collect();

  let field = |idx: usize| -> Option<&str> {
    parts.get(idx).copied().filter(|s| !s.is_empty() && *s != "*")
  };

  let tag = parts
    .iter()
    .take(POS_FIELDS)
    .copied()
    .filter(|s| !s.is_empty() && *s != "*")
    .collect::<Vec<_>>()
    .join("-");

  Token {
    id,
    start,
    end,
    text: surface.to_string(),
    pos: feature_to_upos(feature).to_string(),
    tag,
    lemma: field(IDX_LEMMA).unwrap_or(surface).to_string(),
    norm: surface.to_string(),
    morph: field(IDX_READING).map(|reading| format!("Reading={reading}")),
  }
}

/// Maps an IPADIC / UniDic feature to a Universal Dependencies POS tag.
pub fn feature_to_upos(feature: &str) -> &'static str {
  // ─── Nouns: check sub-classes first ───
  if feature.starts_with("名詞,固有名詞") {
    return "PROPN";
  }
  if feature.starts_with("名詞,代名詞") || feature.starts_with("代名詞") {
    return "PRON";
  }
  if feature.starts_with("名詞,数") {
    return "NUM";
  }
  if feature.starts_with("名詞") || feature.starts_with("接頭詞") || feature.starts_with("接頭辞")
  {
    return "NOUN";
  }

  // ─── UniDic: Suffix,Nominal behaves like a noun ───
  if feature.starts_with("接尾辞,名詞的") {
    return "NOUN";
  }
  if feature.starts_with("接尾辞") {
    return "PART";
  }

  if feature.starts_with("動詞") {
    return "VERB";
  }
  if feature.starts_with("形容詞") || feature.starts_with("形状詞") {
    return "ADJ";
  }
  if feature.starts_with("副詞") {
    return "ADV";
  }
  if feature.starts_with("連体詞") {
    return "DET";
  }
  if feature.starts_with("接続詞") {
    return "CCONJ";
  }
  if feature.starts_with("感動詞") || feature.starts_with("フィラー") {
    return "INTJ";
  }
  if feature.starts_with("助動詞") {
    return "AUX";
  }
  if feature.starts_with("助詞,接続助詞") {
    return "SCONJ";
  }
  if feature.starts_with("助詞") {
    return "ADP";
  }

  // ─── Symbols: IPADIC 記号 / UniDic 補助記号 ───
  if feature.starts_with("補助記号")
    || feature.starts_with("記号,句点")
    || feature.starts_with("記号,読点")
    || feature.starts_with("記号,括弧")
  {
    return "PUNCT";
  }
  if feature.starts_with("記号") {
    return "SYM";
  }

  "X"
}
