//! kaiseki テキスト解析ライブラリー
//!
//! 言語コードからモデルを解決し、遅延ロードしたエンジンでテキストを解析する。
//! 日本語は vibrato-rkyv による形態素解析、その他の言語はルールベースの
//! トークナイズ + Snowball ステミングを行う。

/// 設定モジュール - 辞書設定, レジストリ設定を定義
pub mod config;

/// 辞書モジュール - 形態素解析用辞書の管理・ロード機能を提供
pub mod dictionary;

/// エンジンモジュール - ModelLoader / Engine トレイトと組み込み実装
pub mod engine;

/// エラーモジュール - KaisekiError, KaisekiResult等のエラー型を定義
pub mod errors;

/// 言語モジュール - 言語コードとモデル識別子の静的テーブル
pub mod language;

/// データモデルモジュール - Document, Token, Span を定義
pub mod models;

/// レジストリモジュール - モデルの遅延ロードとキャッシュ
pub mod registry;

/// 再エクスポート
pub use config::{DictionaryConfig, DictionaryPreset, RegistryConfig};
pub use engine::{BuiltinModelLoader, Engine, ModelLoader};
pub use errors::{KaisekiError, KaisekiResult};
pub use language::{LanguageCode, ModelId};
pub use models::Document;
pub use registry::ModelRegistry;
