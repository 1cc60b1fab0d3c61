//! HTTPハンドラー定義

use axum::{Json, body::Bytes, extract::State};
use tracing::debug;

use crate::errors::ApiError;
use crate::models::{Document, ParseRequest};

use super::state::AppState;

/// POST /<任意のパス> エンドポイント
///
/// 指定言語のモデルでテキストを解析する。
///
/// # Request Body
/// ```json
/// { "lang": "en", "text": "解析対象のテキスト" }
/// ```
/// `Content-Type` は問わない（`text/plain` で JSON を送るクライアントがあるため）。
///
/// # Response
/// - 200 OK: 解析結果の Document
/// - 400 Bad Request: ボディ不正、未対応の言語コード
/// - 500 Internal Server Error: モデルのロード失敗、解析失敗
/// - 504 Gateway Timeout: ロード・解析のタイムアウト
pub async fn post_parse(
  State(state): State<AppState>,
  body: Bytes,
) -> Result<Json<Document>, ApiError> {
  let request = ParseRequest::from_slice(&body)?;
  debug!(lang = %request.lang, text_len = request.text.len(), "解析リクエストを受信");

  let document = state.service.parse(request).await?;
  Ok(Json(document))
}

/// ヘルスチェックエンドポイント
///
/// サーバーが稼働しているかを確認する。
pub async fn health_check() -> &'static str {
  "OK"
}
