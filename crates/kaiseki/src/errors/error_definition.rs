//! エラー定義

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use vibrato_rkyv::dictionary::PresetDictionaryKind;

use crate::language::ModelId;

/// 設定関連のエラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ConfigError {
  /// 言語コードに対応するモデル識別子が空
  #[error("モデル識別子が空です: language={language}")]
  EmptyModelId {
    /// 対象の言語コード
    language: String,
  },

  /// 同じモデル識別子が複数の言語コードに割り当てられている
  #[error("モデル識別子が重複しています: model={model}, languages={first}, {second}")]
  DuplicateModelId {
    /// 重複したモデル識別子
    model: String,
    /// 1つ目の言語コード
    first: String,
    /// 2つ目の言語コード
    second: String,
  },

  /// モデル識別子から逆引きした言語コードが一致しない
  #[error("モデル識別子の逆引きが一致しません: model={model}, expected={expected}")]
  ModelTableMismatch {
    /// モデル識別子
    model: String,
    /// 期待した言語コード
    expected: String,
  },

  /// 不明な辞書プリセット名
  #[error("不明な辞書プリセットです: {0} (ipadic, unidic-cwj, unidic-csj のいずれかを指定してください)")]
  UnknownPreset(String),

  /// dictionary.cache_dir が「存在するディレクトリ」でない（ファイルである等）
  #[error("dictionary.cache_dir がディレクトリではありません: path={path:?}")]
  InvalidDictionaryCacheDir {
    /// 不正なパス
    path: PathBuf,
  },

  /// dictionary.cache_dir の作成に失敗
  #[error("dictionary.cache_dir の作成に失敗しました: path={path:?}, error={source}")]
  DictionaryCacheDirCreationFailed {
    /// 作成しようとしたパス
    path: PathBuf,
    /// 元となった IO エラー
    #[source]
    source: Arc<io::Error>,
  },

  /// dictionary.path がファイルとして存在しない
  #[error("dictionary.path に辞書ファイルが存在しません: path={path:?}")]
  DictionaryFileNotFound {
    /// 指定されたパス
    path: PathBuf,
  },
}

/// 辞書関連のエラー
/// Vibrato では mecab, ipadic, unidic 等の辞書を使用可能
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum DictionaryError {
  /// キャッシュディレクトリーが見つからない
  #[error("辞書キャッシュディレクトリーが見つかりません")]
  CacheDirNotFound,

  /// キャッシュディレクトリーの作成失敗
  #[error("辞書キャッシュディレクトリーの作成に失敗しました: {0}")]
  CacheDirCreationFailed(Arc<io::Error>),

  /// 指定された辞書が見つからない
  #[error("指定された辞書が見つかりません: {0}")]
  DictionaryNotFound(String),

  /// 辞書パスが不正または辞書種別が不正
  #[error("辞書パスまたは辞書種別が不正です: path={0}, preset_kind={1:?}")]
  InvalidPathOrInvalidPresetKind(PathBuf, Option<PresetDictionaryKind>),

  /// vibrato-rkyv による辞書のロード失敗
  #[error("vibrato-rkyv 辞書ロードエラー: {0}")]
  VibratoLoad(Arc<dyn std::error::Error + Send + Sync + 'static>),

  /// vibrato-rkyv のプリセット辞書のダウンロード失敗
  #[error("vibrato-rkyv プリセット辞書ダウンロード失敗: {0}")]
  PresetDictDownloadFailed(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

/// モデル（エンジン）のロード・解析に関するエラー
///
/// `ModelLoader` と `Engine` の実装はこのエラーを返すこと。
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ModelError {
  /// 辞書起因のロード失敗
  #[error("辞書エラー: {0}")]
  Dictionary(#[from] DictionaryError),

  /// モデルのロード失敗（アーティファクト欠落、I/O エラー等）
  #[error("モデルのロードに失敗しました: model={model}, reason={reason}")]
  LoadFailed {
    /// 対象モデル
    model: ModelId,
    /// 失敗の理由
    reason: String,
  },

  /// 解析対象の入力テキストが不正
  #[error("解析対象の入力テキストが不正: {reason}")]
  InvalidInput {
    /// 不正の理由
    reason: String,
  },

  /// 解析処理中の失敗
  #[error("解析に失敗しました: model={model}, reason={reason}")]
  AnalysisFailed {
    /// 対象モデル
    model: ModelId,
    /// 失敗の理由
    reason: String,
  },
}

/// モデルレジストリ関連のエラー
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum RegistryError {
  /// 言語コードがテーブルに存在しない
  #[error("サポートされていない言語コードです: '{code}'. Supported language codes: {supported}")]
  UnknownLanguage {
    /// 指定された言語コード
    code: String,
    /// サポートされている言語コードの一覧（表示用）
    supported: String,
  },

  /// ローダーがエンジンを生成できなかった
  #[error("モデルのロードに失敗しました: model={model}: {source}")]
  ModelLoad {
    /// 対象モデル
    model: ModelId,
    /// 元となったエラー
    #[source]
    source: ModelError,
  },

  /// ロードが制限時間内に終わらなかった（ロード自体は継続中）
  #[error("モデルのロードがタイムアウトしました: model={model}, timeout={timeout:?}")]
  LoadTimeout {
    /// 対象モデル
    model: ModelId,
    /// 制限時間
    timeout: Duration,
  },
}

/// 統合エラー
/// 本クレートの外部に公開するエラー用 API はこのエラーを返すこと
/// `KaisekiResult<T>` = `Result<T, KaisekiError>` として使用する
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum KaisekiError {
  /// 辞書関連エラー
  #[error(transparent)]
  Dictionary(#[from] DictionaryError),

  /// モデル関連エラー
  #[error(transparent)]
  Model(#[from] ModelError),

  /// レジストリ関連エラー
  #[error(transparent)]
  Registry(#[from] RegistryError),

  /// 設定エラー
  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// kaiseki クレートの標準 Result 型エイリアス
pub type KaisekiResult<T> = Result<T, KaisekiError>;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::language::LanguageCode;

  #[test]
  fn unknown_language_message_names_code() {
    let err = RegistryError::UnknownLanguage {
      code: "xx-not-real".to_string(),
      supported: "'en' (English)".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("xx-not-real"));
    assert!(message.contains("'en' (English)"));
  }

  #[test]
  fn model_load_error_keeps_source() {
    let model = LanguageCode::En.model_id();
    let err = RegistryError::ModelLoad {
      model,
      source: ModelError::LoadFailed {
        model,
        reason: "missing artifact".to_string(),
      },
    };
    assert!(err.to_string().contains("en_core_web_trf"));
    assert!(std::error::Error::source(&err).is_some());
  }

  #[test]
  fn kaiseki_error_is_transparent() {
    let err: KaisekiError = ConfigError::UnknownPreset("foo".to_string()).into();
    assert!(err.to_string().contains("foo"));
  }
}
