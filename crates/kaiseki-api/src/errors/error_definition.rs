//! APIエラー定義

use std::time::Duration;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// kaiseki クレートのエラー型をインポート
use kaiseki::errors::{ConfigError, ModelError, RegistryError};

/// エラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
  /// リクエストボディが不正
  MalformedRequest,
  /// 未対応の言語コード
  UnknownLanguage,
  /// モデルのロード失敗
  ModelLoadFailed,
  /// 解析失敗
  AnalysisFailed,
  /// モデルのロードがタイムアウト
  LoadTimeout,
  /// 解析がタイムアウト
  AnalysisTimeout,
  /// 内部エラー
  Internal,
  /// 設定エラー
  Config,
}

impl ApiErrorKind {
  /// エラーコードを取得
  #[must_use]
  pub fn code(&self) -> &'static str {
    match self {
      Self::MalformedRequest => "malformed_request",
      Self::UnknownLanguage => "unknown_language",
      Self::ModelLoadFailed => "model_load_failed",
      Self::AnalysisFailed => "analysis_failed",
      Self::LoadTimeout => "load_timeout",
      Self::AnalysisTimeout => "analysis_timeout",
      Self::Internal => "internal_error",
      Self::Config => "config_error",
    }
  }

  /// HTTPステータスコードを取得
  #[must_use]
  pub fn status(&self) -> StatusCode {
    match self {
      Self::MalformedRequest | Self::UnknownLanguage => StatusCode::BAD_REQUEST,
      Self::LoadTimeout | Self::AnalysisTimeout => StatusCode::GATEWAY_TIMEOUT,
      Self::ModelLoadFailed | Self::AnalysisFailed | Self::Internal | Self::Config => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

/// APIエラー
#[derive(Debug, Error)]
pub enum ApiError {
  /// リクエストボディが不正
  #[error("Malformed request: {0}")]
  MalformedRequest(String),

  /// 未対応の言語コード（メッセージにサポート一覧を含む）
  #[error("{0}")]
  UnknownLanguage(String),

  /// モデルのロード失敗
  #[error("{0}")]
  ModelLoadFailed(String),

  /// 解析失敗
  #[error("{0}")]
  AnalysisFailed(String),

  /// モデルのロードがタイムアウト
  #[error("Model load timed out: model={model}, timeout={timeout:?}")]
  LoadTimeout {
    /// 対象モデル
    model: String,
    /// 制限時間
    timeout: Duration,
  },

  /// 解析がタイムアウト
  #[error("Analysis timed out: model={model}, timeout={timeout:?}")]
  AnalysisTimeout {
    /// 対象モデル
    model: String,
    /// 制限時間
    timeout: Duration,
  },

  /// 内部エラー
  #[error("内部エラー: {0}")]
  Internal(String),

  /// 設定エラー
  #[error("設定エラー: {0}")]
  Config(String),
}

impl ApiError {
  /// エラーの種類を取得
  #[must_use]
  pub fn kind(&self) -> ApiErrorKind {
    match self {
      Self::MalformedRequest(_) => ApiErrorKind::MalformedRequest,
      Self::UnknownLanguage(_) => ApiErrorKind::UnknownLanguage,
      Self::ModelLoadFailed(_) => ApiErrorKind::ModelLoadFailed,
      Self::AnalysisFailed(_) => ApiErrorKind::AnalysisFailed,
      Self::LoadTimeout { .. } => ApiErrorKind::LoadTimeout,
      Self::AnalysisTimeout { .. } => ApiErrorKind::AnalysisTimeout,
      Self::Internal(_) => ApiErrorKind::Internal,
      Self::Config(_) => ApiErrorKind::Config,
    }
  }

  /// エラーコードを取得
  #[must_use]
  pub fn code(&self) -> &'static str {
    self.kind().code()
  }

  /// HTTPステータスコードを取得
  #[must_use]
  pub fn status(&self) -> StatusCode {
    self.kind().status()
  }

  /// 不正リクエストエラーを作成
  #[must_use]
  pub fn malformed_request(message: impl Into<String>) -> Self {
    Self::MalformedRequest(message.into())
  }

  /// 内部エラーを作成
  #[must_use]
  pub fn internal(message: impl Into<String>) -> Self {
    Self::Internal(message.into())
  }

  /// 設定エラーを作成
  #[must_use]
  pub fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }
}

/// エラーレスポンスのJSON構造
#[derive(Serialize)]
struct ErrorResponse {
  error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
  code: &'static str,
  message: String,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = ErrorResponse {
      error: ErrorBody {
        code: self.code(),
        message: self.to_string(),
      },
    };

    (status, Json(body)).into_response()
  }
}

/// RegistryError から ApiError への変換
impl From<RegistryError> for ApiError {
  fn from(err: RegistryError) -> Self {
    match err {
      RegistryError::UnknownLanguage { .. } => ApiError::UnknownLanguage(err.to_string()),
      RegistryError::ModelLoad { .. } => ApiError::ModelLoadFailed(err.to_string()),
      RegistryError::LoadTimeout { model, timeout } => ApiError::LoadTimeout {
        model: model.name().to_string(),
        timeout,
      },
      // #[non_exhaustive] な enum のため、将来追加されるバリアントに対応
      _ => ApiError::internal(format!("unknown registry error: {err}")),
    }
  }
}

/// ModelError から ApiError への変換
///
/// ロード済みエンジンの `analyze` が返すエラーを想定する。
impl From<ModelError> for ApiError {
  fn from(err: ModelError) -> Self {
    match err {
      ModelError::InvalidInput { .. } | ModelError::AnalysisFailed { .. } => {
        ApiError::AnalysisFailed(err.to_string())
      }
      ModelError::Dictionary(_) | ModelError::LoadFailed { .. } => {
        ApiError::ModelLoadFailed(err.to_string())
      }
      _ => ApiError::internal(format!("unknown model error: {err}")),
    }
  }
}

impl From<ConfigError> for ApiError {
  fn from(err: ConfigError) -> Self {
    ApiError::config(err.to_string())
  }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;
