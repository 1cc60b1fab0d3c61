//! API State Definition

use std::sync::Arc;

use crate::config::Config;
use crate::service::ParseService;

/// Application State
///
/// State shared across the entire server.
/// Contains configuration and the analysis service (which owns the model registry).
#[derive(Clone)]
pub struct AppState {
  /// Configuration
  pub config: Config,
  /// Text analysis service
  ///
  /// - Production: registry over `BuiltinModelLoader`
  /// - Test: registry over a stub loader
  pub service: Arc<ParseService>,
}

impl AppState {
  /// Creates a new AppState
  #[must_use]
  pub fn new(config: Config, service: Arc<ParseService>) -> Self {
    Self { config, service }
  }
}
