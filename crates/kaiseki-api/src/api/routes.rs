//! ルーター定義

use axum::{
  Router,
  routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};

use super::handlers::{health_check, post_parse};
use super::state::AppState;
use crate::errors::ApiError;

/// APIルーターを作成する
///
/// - 任意のパスへの POST を解析リクエストとして扱う
/// - `GET /health` はヘルスチェック（`POST /health` は解析リクエスト）
/// - それ以外のメソッドは 405
///
/// # Arguments
/// * `state` - アプリケーション状態
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/health", get(health_check).post(post_parse))
    .route("/", post(post_parse))
    .route("/{*path}", post(post_parse))
    .layer(CatchPanicLayer::new())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// サーバーを起動する
///
/// Ctrl-C を受けると処理中のリクエストを終えてから停止する。
///
/// # Errors
/// バインドに失敗した場合、またはサーバーがエラーで停止した場合
pub async fn run_server(state: AppState) -> crate::errors::Result<()> {
  let (host, port) = state.config.bind_addr();
  let listener = tokio::net::TcpListener::bind((host, port))
    .await
    .map_err(|e| ApiError::config(format!("バインドに失敗しました: {host}:{port}: {e}")))?;

  info!("サーバーを起動します: http://{}:{}", host, port);

  let router = create_router(state);

  axum::serve(listener, router)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| ApiError::internal(format!("サーバーエラー: {e}")))?;

  info!("サーバーを停止しました");
  Ok(())
}

async fn shutdown_signal() {
  match tokio::signal::ctrl_c().await {
    Ok(()) => info!("Ctrl-C を受信しました。シャットダウンします"),
    Err(e) => {
      // シグナルを待てない場合はプロセス終了まで動かし続ける
      warn!(error = %e, "シグナルハンドラーの登録に失敗しました");
      std::future::pending::<()>().await;
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use kaiseki::{BuiltinModelLoader, ModelRegistry, RegistryConfig};

  use super::*;
  use crate::config::Config;
  use crate::service::ParseService;

  fn create_test_state() -> AppState {
    // 辞書を使わない言語だけを対象にする
    let registry =
      ModelRegistry::new(Arc::new(BuiltinModelLoader::default()), RegistryConfig::default());
    let service = Arc::new(ParseService::new(Arc::new(registry), None));
    AppState::new(Config::default(), service)
  }

  #[test]
  fn test_router_creation() {
    let state = create_test_state();
    let _router = create_router(state);
  }
}
