//! モデルモジュール

mod document;

pub use document::{Document, Span, Token, is_sentence_terminator};
