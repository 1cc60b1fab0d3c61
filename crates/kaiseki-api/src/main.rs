//! kaiseki-api サーバーエントリーポイント

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kaiseki::language::validate_model_table;
use kaiseki::{BuiltinModelLoader, ModelRegistry};
use kaiseki_api::ApiError;
use kaiseki_api::api::{AppState, run_server};
use kaiseki_api::config::Config;
use kaiseki_api::service::ParseService;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
  // ロギングの初期化（RUST_LOG で上書き可能）
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with(tracing_subscriber::fmt::layer())
    .init();

  // 設定の読み込み
  let config = Config::parse();
  tracing::info!(
    listen = %config.listen,
    port = config.port,
    preset = %config.preset,
    "設定を読み込みました"
  );

  // 起動前の検証
  validate_model_table()?;
  let dictionary = config.dictionary_config();
  dictionary.validate()?;

  // レジストリとサービスの初期化（モデルは初回リクエスト時にロード）
  let loader = Arc::new(BuiltinModelLoader::new(dictionary));
  let registry = Arc::new(ModelRegistry::new(loader, config.registry_config()));

  let preload = config.preload_codes();
  if !preload.is_empty() {
    let ready = registry.preload(&preload).await;
    tracing::info!(models = ?ready, "モデルを事前ロードしました");
  }

  let service = Arc::new(ParseService::new(registry, config.analysis_timeout()));

  // アプリケーション状態の作成
  let state = AppState::new(config, service);

  // サーバー起動
  run_server(state).await
}
