//! Document Model Definition
//!
//! The annotated result of running one engine over one text. Serialized as the
//! HTTP response body as-is.

use serde::{Deserialize, Serialize};

use crate::language::ModelId;

/// Characters that end a sentence when a token consists only of them
const TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？', '…', '‼', '⁇', '⁈', '⁉'];

/// Closing marks that stay attached to the sentence they follow
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '」', '』', '）', '】', '”', '’', '»'];

/// Annotated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
  /// Name of the model that produced this document
  pub model: String,
  /// Input text
  pub text: String,
  /// Tokens in text order
  pub tokens: Vec<Token>,
  /// Sentence spans in text order
  pub sents: Vec<Span>,
}

/// Token Information
///
/// `start` / `end` are character offsets into [`Document::text`] (end exclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
  /// Index of the token within the document
  pub id: usize,
  /// Start character position
  pub start: usize,
  /// End character position
  pub end: usize,
  /// Surface form (string appearing in original text)
  pub text: String,
  /// Coarse part of speech (Universal Dependencies tag set)
  pub pos: String,
  /// Fine-grained tag (engine specific)
  pub tag: String,
  /// Lemma (dictionary form, or stem for rule-based models)
  pub lemma: String,
  /// Normalized form
  pub norm: String,
  /// Morphological features (e.g. `Reading=トウキョウ`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub morph: Option<String>,
}

/// Character span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
  /// Start character position
  pub start: usize,
  /// End character position (exclusive)
  pub end: usize,
}

impl Document {
  /// Builds a document and derives sentence spans from the tokens.
  #[must_use]
  pub fn new(model: ModelId, text: impl Into<String>, tokens: Vec<Token>) -> Self {
    let sents = segment_sentences(&tokens);
    Self {
      model: model.name().to_string(),
      text: text.into(),
      tokens,
      sents,
    }
  }

  /// Surface forms of all tokens
  pub fn token_texts(&self) -> Vec<&str> {
    self.tokens.iter().map(|t| t.text.as_str()).collect()
  }
}

/// Returns true if the token text only consists of sentence terminators.
pub fn is_sentence_terminator(text: &str) -> bool {
  !text.is_empty() && text.chars().all(|c| TERMINATORS.contains(&c))
}

fn is_closer(text: &str) -> bool {
  !text.is_empty() && text.chars().all(|c| CLOSERS.contains(&c))
}

/// Splits the token sequence into sentences.
///
/// A sentence ends after a terminator token plus any closing quotes/brackets that
/// directly touch it (no gap in character offsets). A quote after whitespace
/// opens the next sentence. Trailing tokens without a terminator form the last
/// sentence.
fn segment_sentences(tokens: &[Token]) -> Vec<Span> {
  let mut sents = Vec::new();
  // (sentence start, end once a terminator was seen)
  let mut current: Option<(usize, Option<usize>)> = None;

  for token in tokens {
    if let Some((start, Some(end))) = current {
      if is_closer(&token.text) && token.start == end {
        current = Some((start, Some(token.end)));
        continue;
      }
      sents.push(Span { start, end });
      current = None;
    }

    let start = current.map_or(token.start, |(start, _)| start);
    let end = is_sentence_terminator(&token.text).then_some(token.end);
    current = Some((start, end));
  }

  if let Some((start, end)) = current {
    let end = end.or_else(|| tokens.last().map(|t| t.end)).unwrap_or(start);
    sents.push(Span { start, end });
  }

  sents
}
