//! リクエストモデル定義

use serde::Deserialize;

use crate::errors::{ApiError, Result};

/// 解析リクエスト
///
/// `Content-Type` は問わない。ボディが JSON オブジェクトで、`lang` と `text` が
/// 文字列であること。それ以外のフィールドは無視する。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParseRequest {
  /// 言語コード（例: "en", "ja"）
  pub lang: String,
  /// 解析対象のテキスト
  pub text: String,
}

impl ParseRequest {
  /// 生のリクエストボディからパースする
  ///
  /// # Errors
  /// JSON として不正、または `lang` / `text` が欠落・非文字列の場合は
  /// `ApiError::MalformedRequest`
  pub fn from_slice(body: &[u8]) -> Result<Self> {
    let value: serde_json::Value =
      serde_json::from_slice(body).map_err(|e| ApiError::malformed_request(e.to_string()))?;

    // 配列 `["en", "..."]` も構造体としてデシリアライズできてしまうため弾く
    if !value.is_object() {
      return Err(ApiError::malformed_request("request body must be a JSON object"));
    }

    serde_json::from_value(value).map_err(|e| ApiError::malformed_request(e.to_string()))
  }
}
