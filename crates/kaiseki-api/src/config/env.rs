//! Config loading from command line flags and environment variables

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use kaiseki::{DictionaryConfig, DictionaryPreset, RegistryConfig};

use super::constants::{
  DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_LOAD_TIMEOUT_SECS, DEFAULT_PORT,
  DEFAULT_PRESET_DICT,
};

/// API Server Configuration
///
/// Every flag falls back to a `KAISEKI_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "kaiseki-api", version, about = "Language-routed text analysis over HTTP")]
pub struct Config {
  /// Address to listen on
  #[arg(short, long, env = "KAISEKI_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
  pub listen: String,

  /// Port to listen on
  #[arg(short, long, env = "KAISEKI_PORT", default_value_t = DEFAULT_PORT)]
  pub port: u16,

  /// Dictionary preset for the Japanese model (ipadic, unidic-cwj, unidic-csj)
  #[arg(long, env = "KAISEKI_PRESET_DICT", default_value = DEFAULT_PRESET_DICT)]
  pub preset: DictionaryPreset,

  /// Local dictionary file used instead of the preset
  #[arg(long, env = "KAISEKI_DICT_PATH")]
  pub dict_path: Option<PathBuf>,

  /// Directory preset dictionaries are downloaded into
  #[arg(long, env = "KAISEKI_DICT_CACHE_DIR")]
  pub dict_cache_dir: Option<PathBuf>,

  /// Upper bound on one model load in seconds (0 disables)
  #[arg(long, env = "KAISEKI_LOAD_TIMEOUT_SECS", default_value_t = DEFAULT_LOAD_TIMEOUT_SECS)]
  pub load_timeout_secs: u64,

  /// Upper bound on one analysis in seconds (0 disables)
  #[arg(
    long,
    env = "KAISEKI_ANALYSIS_TIMEOUT_SECS",
    default_value_t = DEFAULT_ANALYSIS_TIMEOUT_SECS
  )]
  pub analysis_timeout_secs: u64,

  /// Language codes to load at startup (comma separated)
  #[arg(long, env = "KAISEKI_PRELOAD", value_delimiter = ',')]
  pub preload: Vec<String>,

  /// Also accept full model names (e.g. en_core_web_trf) as `lang`
  #[arg(long, env = "KAISEKI_ACCEPT_MODEL_NAMES")]
  pub accept_model_names: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      listen: DEFAULT_LISTEN_ADDR.to_string(),
      port: DEFAULT_PORT,
      preset: DictionaryPreset::UnidicCwj,
      dict_path: None,
      dict_cache_dir: None,
      load_timeout_secs: DEFAULT_LOAD_TIMEOUT_SECS,
      analysis_timeout_secs: DEFAULT_ANALYSIS_TIMEOUT_SECS,
      preload: Vec::new(),
      accept_model_names: false,
    }
  }
}

impl Config {
  /// `(host, port)` pair to bind
  pub fn bind_addr(&self) -> (&str, u16) {
    (self.listen.as_str(), self.port)
  }

  /// Dictionary settings for the Japanese model
  pub fn dictionary_config(&self) -> DictionaryConfig {
    DictionaryConfig {
      preset: self.preset,
      cache_dir: self.dict_cache_dir.clone(),
      path: self.dict_path.clone(),
    }
  }

  /// Settings for the model registry
  pub fn registry_config(&self) -> RegistryConfig {
    RegistryConfig {
      load_timeout: secs_to_timeout(self.load_timeout_secs),
      accept_model_names: self.accept_model_names,
    }
  }

  /// Analysis timeout, `None` when disabled
  pub fn analysis_timeout(&self) -> Option<Duration> {
    secs_to_timeout(self.analysis_timeout_secs)
  }

  /// Preload codes with blanks removed
  pub fn preload_codes(&self) -> Vec<&str> {
    self.preload.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect()
  }
}

fn secs_to_timeout(secs: u64) -> Option<Duration> {
  (secs > 0).then(|| Duration::from_secs(secs))
}
