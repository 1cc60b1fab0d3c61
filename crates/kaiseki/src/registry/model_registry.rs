// crates/kaiseki/src/registry/model_registry.rs

//! ModelRegistry: process-wide cache of loaded engines.
//!
//! - language code → model identifier (static table)
//! - model identifier → engine, loaded lazily on first use, never evicted
//!
//! # Concurrency
//!
//! Each model identifier has a slot in a map behind a short-held `Mutex`. The
//! first request for a model spawns a load task and stores a `watch::Receiver`
//! for its result in the slot; later requests clone that receiver and wait on
//! the same load. So:
//! - concurrent first requests for one model share a single load,
//! - loads for different models run in parallel,
//! - a failed load clears the slot and the next request retries,
//! - `load_timeout` bounds how long a caller waits, not the load itself. A
//!   caller that gives up leaves the load running, and the next request joins
//!   it instead of starting another one.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::RegistryConfig;
use crate::engine::{Engine, ModelLoader};
use crate::errors::{ModelError, RegistryError};
use crate::language::{LanguageCode, ModelId};

type LoadResult = Result<Arc<dyn Engine>, RegistryError>;
type LoadReceiver = watch::Receiver<Option<LoadResult>>;
type Slots = Arc<Mutex<HashMap<ModelId, Slot>>>;

/// Per-model state
#[derive(Default)]
struct Slot {
  /// Ready engine, set once the load succeeded
  engine: Option<Arc<dyn Engine>>,
  /// Result channel of the load currently running, if any
  in_flight: Option<LoadReceiver>,
}

/// Process-wide model cache.
///
/// Construct once at startup and share behind an `Arc`. `get_or_load` must be
/// called from within a tokio runtime.
pub struct ModelRegistry {
  loader: Arc<dyn ModelLoader>,
  slots: Slots,
  config: RegistryConfig,
}

impl ModelRegistry {
  /// Creates an empty registry over `loader`
  pub fn new(loader: Arc<dyn ModelLoader>, config: RegistryConfig) -> Self {
    Self {
      loader,
      slots: Arc::default(),
      config,
    }
  }

  /// Registry settings
  pub fn config(&self) -> &RegistryConfig {
    &self.config
  }

  /// Resolves a language code to its model identifier.
  ///
  /// With `accept_model_names`, a full model name from the table is accepted too.
  ///
  /// # Errors
  /// `RegistryError::UnknownLanguage` if the code is not in the table.
  pub fn resolve(&self, code: &str) -> Result<ModelId, RegistryError> {
    match LanguageCode::from_str(code) {
      Ok(lang) => Ok(lang.model_id()),
      Err(err) if self.config.accept_model_names => ModelId::from_name(code).ok_or(err),
      Err(err) => Err(err),
    }
  }

  /// Returns the cached engine for `model`, loading it first if needed.
  ///
  /// # Errors
  /// - `RegistryError::ModelLoad` when the loader fails (or panics)
  /// - `RegistryError::LoadTimeout` when the load does not finish within
  ///   `load_timeout`; the load keeps running and later calls join it
  ///
  /// Neither error is cached.
  pub async fn get_or_load(&self, model: ModelId) -> Result<Arc<dyn Engine>, RegistryError> {
    let receiver = {
      let mut slots = lock(&self.slots);
      let slot = slots.entry(model).or_default();

      if let Some(engine) = &slot.engine {
        debug!(model = %model, "Model cache hit");
        return Ok(Arc::clone(engine));
      }

      match &slot.in_flight {
        Some(receiver) => {
          debug!(model = %model, "Joining in-flight model load");
          receiver.clone()
        }
        None => {
          let (sender, receiver) = watch::channel(None);
          slot.in_flight = Some(receiver.clone());
          self.spawn_load(model, sender);
          receiver
        }
      }
    };

    let outcome = match self.config.load_timeout {
      Some(timeout) => match tokio::time::timeout(timeout, wait_for_load(receiver)).await {
        Ok(outcome) => outcome,
        Err(_) => {
          warn!(model = %model, ?timeout, "Gave up waiting for model load");
          return Err(RegistryError::LoadTimeout { model, timeout });
        }
      },
      None => wait_for_load(receiver).await,
    };

    outcome.unwrap_or_else(|| {
      Err(RegistryError::ModelLoad {
        model,
        source: ModelError::LoadFailed {
          model,
          reason: "load task ended without a result".to_string(),
        },
      })
    })
  }

  /// Identifiers of all models with a ready engine, sorted by name
  pub fn loaded_models(&self) -> Vec<ModelId> {
    let slots = lock(&self.slots);
    let mut models: Vec<ModelId> =
      slots.iter().filter(|(_, slot)| slot.engine.is_some()).map(|(model, _)| *model).collect();
    models.sort_by_key(|model| model.name());
    models
  }

  /// Loads the models for `codes` ahead of the first request.
  ///
  /// Failures are logged and skipped. Returns the models that are ready.
  pub async fn preload<S: AsRef<str>>(&self, codes: &[S]) -> Vec<ModelId> {
    let mut ready = Vec::new();
    for code in codes {
      let code = code.as_ref();
      let model = match self.resolve(code) {
        Ok(model) => model,
        Err(err) => {
          warn!(lang = code, error = %err, "Skipping preload of unknown language");
          continue;
        }
      };
      match self.get_or_load(model).await {
        Ok(_) => ready.push(model),
        Err(err) => warn!(model = %model, error = %err, "Preload failed"),
      }
    }
    ready
  }

  /// Starts the load task for `model`. It outlives the caller that started it.
  ///
  /// The slot is updated before the result is published, so a request arriving
  /// after the load sees either the engine or an empty slot, never a stale
  /// receiver.
  fn spawn_load(&self, model: ModelId, sender: watch::Sender<Option<LoadResult>>) {
    let loader = Arc::clone(&self.loader);
    let slots = Arc::clone(&self.slots);

    tokio::spawn(async move {
      let result = load_engine(loader, model).await;
      {
        let mut slots = lock(&slots);
        let slot = slots.entry(model).or_default();
        if let Ok(engine) = &result {
          slot.engine = Some(Arc::clone(engine));
        }
        slot.in_flight = None;
      }
      sender.send_replace(Some(result));
    });
  }
}

/// Runs the loader on the blocking pool
async fn load_engine(loader: Arc<dyn ModelLoader>, model: ModelId) -> LoadResult {
  info!(model = %model, "Loading model");
  let start = Instant::now();

  let joined = tokio::task::spawn_blocking(move || loader.load(model)).await;

  let result = joined.map_err(|e| ModelError::LoadFailed {
    model,
    reason: format!("loader task failed: {e}"),
  });

  match result.and_then(|loaded| loaded) {
    Ok(engine) => {
      info!(model = %model, elapsed_ms = elapsed_ms(start), "Model loaded");
      Ok(engine)
    }
    Err(source) => {
      error!(model = %model, error = %source, "Model load failed");
      Err(RegistryError::ModelLoad { model, source })
    }
  }
}

/// Waits until the load publishes its result. `None` if the task went away first.
async fn wait_for_load(mut receiver: LoadReceiver) -> Option<LoadResult> {
  match receiver.wait_for(Option::is_some).await {
    Ok(current) => current.clone(),
    Err(_) => None,
  }
}

fn lock(slots: &Slots) -> MutexGuard<'_, HashMap<ModelId, Slot>> {
  slots.lock().unwrap_or_else(PoisonError::into_inner)
}

fn elapsed_ms(start: Instant) -> u64 {
  u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl std::fmt::Debug for ModelRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ModelRegistry")
      .field("loaded_models", &self.loaded_models())
      .field("config", &self.config)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::RuleEngine;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn counting_loader(count: Arc<AtomicUsize>) -> Arc<dyn ModelLoader> {
    Arc::new(move |model: ModelId| -> Result<Arc<dyn Engine>, ModelError> {
      count.fetch_add(1, Ordering::SeqCst);
      Ok(Arc::new(RuleEngine::new(model)))
    })
  }

  #[test]
  fn resolve_known_and_unknown() {
    let registry =
      ModelRegistry::new(counting_loader(Arc::default()), RegistryConfig::default());
    assert_eq!(registry.resolve("en").unwrap(), LanguageCode::En.model_id());
    assert!(matches!(
      registry.resolve("xx-not-real"),
      Err(RegistryError::UnknownLanguage { .. })
    ));
    // Model names are rejected unless enabled
    assert!(registry.resolve("en_core_web_trf").is_err());
  }

  #[test]
  fn resolve_accepts_model_names_when_enabled() {
    let config = RegistryConfig {
      accept_model_names: true,
      ..RegistryConfig::default()
    };
    let registry = ModelRegistry::new(counting_loader(Arc::default()), config);
    assert_eq!(registry.resolve("ja_core_news_trf").unwrap(), LanguageCode::Ja.model_id());
    assert_eq!(registry.resolve("ja").unwrap(), LanguageCode::Ja.model_id());
    assert!(registry.resolve("en_core_web_sm").is_err());
  }

  #[tokio::test]
  async fn second_call_hits_cache() {
    let count = Arc::new(AtomicUsize::new(0));
    let registry = ModelRegistry::new(counting_loader(count.clone()), RegistryConfig::default());
    let model = LanguageCode::En.model_id();

    let first = registry.get_or_load(model).await.unwrap();
    let second = registry.get_or_load(model).await.unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.loaded_models(), vec![model]);
  }

  #[tokio::test]
  async fn loaded_models_are_sorted() {
    let registry =
      ModelRegistry::new(counting_loader(Arc::default()), RegistryConfig::default());
    registry.get_or_load(LanguageCode::Ru.model_id()).await.unwrap();
    registry.get_or_load(LanguageCode::De.model_id()).await.unwrap();
    assert_eq!(
      registry.loaded_models(),
      vec![LanguageCode::De.model_id(), LanguageCode::Ru.model_id()]
    );
  }

  #[tokio::test]
  async fn preload_skips_unknown_codes() {
    let count = Arc::new(AtomicUsize::new(0));
    let registry = ModelRegistry::new(counting_loader(count.clone()), RegistryConfig::default());

    let ready = registry.preload(&["fr", "nope", "es"]).await;

    assert_eq!(ready, vec![LanguageCode::Fr.model_id(), LanguageCode::Es.model_id()]);
    assert_eq!(count.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn loader_panic_becomes_load_error() {
    let loader: Arc<dyn ModelLoader> =
      Arc::new(|_: ModelId| -> Result<Arc<dyn Engine>, ModelError> { panic!("corrupt weights") });
    let registry = ModelRegistry::new(loader, RegistryConfig::default());

    let err = registry.get_or_load(LanguageCode::It.model_id()).await.err().unwrap();
    assert!(matches!(err, RegistryError::ModelLoad { .. }), "{err:?}");
    assert!(registry.loaded_models().is_empty());
  }
}
