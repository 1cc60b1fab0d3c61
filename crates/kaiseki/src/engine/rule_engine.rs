//! Rule-based engine for languages without a dictionary model
//!
//! - Whitespace separates words.
//! - Leading/trailing punctuation is split off (`"world."` → `world`, `.`),
//!   runs of sentence terminators stay together (`?!`, `...`).
//! - Han ideographs and kana become one token per character.
//! - `norm` is lowercase, `lemma` is the Snowball stem where rust-stemmers has an
//!   algorithm for the language.

use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

use super::{Engine, check_input};
use crate::errors::ModelError;
use crate::language::{LanguageCode, ModelId};
use crate::models::{Document, Token, is_sentence_terminator};

/// Characters tagged `SYM` instead of `PUNCT`
const SYMBOLS: &[char] = &[
  '$', '%', '+', '<', '=', '>', '^', '`', '|', '~', '#', '&', '*', '@', '€', '£', '¥', '°', '§',
];

/// Rule-based engine
pub struct RuleEngine {
  model: ModelId,
  stemmer: Option<Stemmer>,
}

impl RuleEngine {
  /// Creates the engine for `model`
  pub fn new(model: ModelId) -> Self {
    let stemmer = stemming_algorithm(model.language()).map(Stemmer::create);
    Self { model, stemmer }
  }

  /// Whether lemmas are stems (false means lemma == norm)
  pub fn has_stemmer(&self) -> bool {
    self.stemmer.is_some()
  }

  fn lemma(&self, norm: &str, pos: &str) -> String {
    match (&self.stemmer, pos) {
      (Some(stemmer), "X") => stemmer.stem(norm).into_owned(),
      _ => norm.to_string(),
    }
  }
}

impl Engine for RuleEngine {
  fn model_id(&self) -> ModelId {
    self.model
  }

  fn analyze(&self, text: &str) -> Result<Document, ModelError> {
    check_input(self.model, text)?;
    let pieces = segment(text);

    let tokens: Vec<Token> = pieces
      .into_iter()
      .enumerate()
      .map(|(id, (start, surface))| {
        let end = start + surface.chars().count();
        let pos = coarse_pos(&surface);
        let norm = surface.to_lowercase();
        let lemma = self.lemma(&norm, pos);
        Token {
          id,
          start,
          end,
          text: surface,
          pos: pos.to_string(),
          tag: pos.to_string(),
          lemma,
          norm,
          morph: None,
        }
      })
      .collect();

    debug!(model = %self.model, token_count = tokens.len(), "Rule-based analysis completed");

    Ok(Document::new(self.model, text, tokens))
  }
}

/// Snowball algorithm used for lemmas; `None` keeps the lowercase form
fn stemming_algorithm(language: LanguageCode) -> Option<Algorithm> {
  match language {
    LanguageCode::Da => Some(Algorithm::Danish),
    LanguageCode::Nl => Some(Algorithm::Dutch),
    LanguageCode::En => Some(Algorithm::English),
    LanguageCode::Fr => Some(Algorithm::French),
    LanguageCode::De => Some(Algorithm::German),
    LanguageCode::It => Some(Algorithm::Italian),
    LanguageCode::Nb => Some(Algorithm::Norwegian),
    LanguageCode::Pt => Some(Algorithm::Portuguese),
    LanguageCode::Ro => Some(Algorithm::Romanian),
    LanguageCode::Ru => Some(Algorithm::Russian),
    LanguageCode::Es => Some(Algorithm::Spanish),
    _ => None,
  }
}

/// Han ideographs and kana
fn is_cjk(c: char) -> bool {
  matches!(c,
    '\u{3040}'..='\u{30FF}'
    | '\u{3400}'..='\u{4DBF}'
    | '\u{4E00}'..='\u{9FFF}'
    | '\u{F900}'..='\u{FAFF}'
    | '\u{20000}'..='\u{2A6DF}')
}

fn is_punct(c: char) -> bool {
  !c.is_alphanumeric() && !c.is_whitespace()
}

fn coarse_pos(surface: &str) -> &'static str {
  if surface.chars().all(|c| SYMBOLS.contains(&c)) {
    "SYM"
  } else if surface.chars().all(is_punct) {
    "PUNCT"
  } else if surface.chars().any(|c| c.is_numeric())
    && surface.chars().all(|c| c.is_numeric() || matches!(c, '.' | ',' | '-'))
  {
    "NUM"
  } else {
    "X"
  }
}

/// Splits text into `(start char offset, surface)` pieces.
fn segment(text: &str) -> Vec<(usize, String)> {
  let mut pieces = Vec::new();
  let mut word: Vec<(usize, char)> = Vec::new();

  for (idx, c) in text.chars().enumerate() {
    if c.is_whitespace() {
      split_word(&word, &mut pieces);
      word.clear();
    } else if is_cjk(c) {
      split_word(&word, &mut pieces);
      word.clear();
      pieces.push((idx, c.to_string()));
    } else {
      word.push((idx, c));
    }
  }
  split_word(&word, &mut pieces);

  pieces
}

/// Peels punctuation off both ends of a whitespace-free word.
fn split_word(word: &[(usize, char)], pieces: &mut Vec<(usize, String)>) {
  let Some(core_start) = word.iter().position(|&(_, c)| !is_punct(c)) else {
    push_punct_run(word, pieces);
    return;
  };
  let core_end = word.iter().rposition(|&(_, c)| !is_punct(c)).unwrap_or(core_start) + 1;

  push_punct_run(&word[..core_start], pieces);
  let core = &word[core_start..core_end];
  pieces.push((core[0].0, core.iter().map(|&(_, c)| c).collect()));
  push_punct_run(&word[core_end..], pieces);
}

/// Emits punctuation one char per token, except runs of terminators (`...`, `?!`).
fn push_punct_run(run: &[(usize, char)], pieces: &mut Vec<(usize, String)>) {
  let mut i = 0;
  while i < run.len() {
    let (start, c) = run[i];
    let mut surface = c.to_string();
    i += 1;
    if is_sentence_terminator(&surface) {
      while i < run.len() && is_sentence_terminator(&run[i].1.to_string()) {
        surface.push(run[i].1);
        i += 1;
      }
    }
    pieces.push((start, surface));
  }
}
