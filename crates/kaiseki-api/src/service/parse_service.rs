//! Text analysis service
//!
//! Resolves the language, fetches (or loads) the engine from the registry and
//! runs the analysis on the blocking thread pool.

use std::sync::Arc;
use std::time::{Duration, Instant};

use kaiseki::{Document, ModelRegistry};
use tracing::{debug, error, info};

use crate::errors::{ApiError, Result};
use crate::models::ParseRequest;

/// Analysis service shared by all request handlers
#[derive(Debug, Clone)]
pub struct ParseService {
  registry: Arc<ModelRegistry>,
  analysis_timeout: Option<Duration>,
}

impl ParseService {
  /// Creates the service over a registry.
  ///
  /// `analysis_timeout` bounds a single `analyze` call; `None` waits indefinitely.
  #[must_use]
  pub fn new(registry: Arc<ModelRegistry>, analysis_timeout: Option<Duration>) -> Self {
    Self {
      registry,
      analysis_timeout,
    }
  }

  /// Underlying model registry
  pub fn registry(&self) -> &Arc<ModelRegistry> {
    &self.registry
  }

  /// Analyzes `request.text` with the model for `request.lang`
  ///
  /// # Errors
  /// - `UnknownLanguage` before the registry is touched
  /// - `ModelLoadFailed` / `LoadTimeout` from the registry
  /// - `AnalysisFailed` / `AnalysisTimeout` from the engine
  /// - `Internal` if the analysis task panicked
  pub async fn parse(&self, request: ParseRequest) -> Result<Document> {
    let ParseRequest { lang, text } = request;

    let model = self.registry.resolve(&lang)?;
    let engine = self.registry.get_or_load(model).await?;

    debug!(lang = %lang, model = %model, text_len = text.len(), "Analyzing text");
    let start = Instant::now();

    // CPUバウンドな処理を spawn_blocking で実行
    let task = tokio::task::spawn_blocking(move || engine.analyze(&text));

    let joined = match self.analysis_timeout {
      Some(timeout) => tokio::time::timeout(timeout, task).await.map_err(|_| {
        error!(model = %model, ?timeout, "Analysis timed out");
        ApiError::AnalysisTimeout {
          model: model.name().to_string(),
          timeout,
        }
      })?,
      None => task.await,
    };

    let document = joined
      .map_err(|e| {
        error!(model = %model, error = %e, "spawn_blocking エラー");
        ApiError::internal("処理の実行に失敗しました")
      })?
      .inspect_err(|e| error!(model = %model, error = %e, "Analysis failed"))?;

    info!(
      model = %model,
      token_count = document.tokens.len(),
      elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
      "Analysis completed"
    );

    Ok(document)
  }
}
