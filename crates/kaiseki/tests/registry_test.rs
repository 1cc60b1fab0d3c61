//! crates/kaiseki/tests/registry_test.rs
//!
//! ModelRegistry concurrency and failure behavior, using stub loaders so no
//! dictionary is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use kaiseki::engine::{Engine, ModelLoader, RuleEngine};
use kaiseki::errors::{ModelError, RegistryError};
use kaiseki::{LanguageCode, ModelId, ModelRegistry, RegistryConfig};

/// Loader that sleeps, then counts how many times each model was loaded
struct SlowLoader {
  delay: Duration,
  calls: AtomicUsize,
}

impl ModelLoader for SlowLoader {
  fn load(&self, model: ModelId) -> Result<Arc<dyn Engine>, ModelError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    std::thread::sleep(self.delay);
    Ok(Arc::new(RuleEngine::new(model)))
  }
}

/// Loader that fails the first `failures` calls
struct FlakyLoader {
  failures: usize,
  calls: AtomicUsize,
}

impl ModelLoader for FlakyLoader {
  fn load(&self, model: ModelId) -> Result<Arc<dyn Engine>, ModelError> {
    let call = self.calls.fetch_add(1, Ordering::SeqCst);
    if call < self.failures {
      return Err(ModelError::LoadFailed {
        model,
        reason: "missing model artifact".to_string(),
      });
    }
    Ok(Arc::new(RuleEngine::new(model)))
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_requests_share_one_load() {
  const CALLERS: usize = 16;

  let loader = Arc::new(SlowLoader {
    delay: Duration::from_millis(200),
    calls: AtomicUsize::new(0),
  });
  let registry = Arc::new(ModelRegistry::new(loader.clone(), RegistryConfig::default()));
  let model = LanguageCode::En.model_id();

  let handles: Vec<_> = (0..CALLERS)
    .map(|_| {
      let registry = Arc::clone(&registry);
      tokio::spawn(async move { registry.get_or_load(model).await })
    })
    .collect();

  let mut engines = Vec::with_capacity(CALLERS);
  for handle in handles {
    engines.push(handle.await.expect("task panicked").expect("load failed"));
  }

  assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
  for engine in &engines {
    assert!(Arc::ptr_eq(engine, &engines[0]));
    assert_eq!(engine.model_id(), model);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_models_load_in_parallel() {
  // Both loads have to be inside the loader at the same time to pass the barrier.
  let barrier = Arc::new(Barrier::new(2));
  let loader_barrier = Arc::clone(&barrier);
  let loader: Arc<dyn ModelLoader> =
    Arc::new(move |model: ModelId| -> Result<Arc<dyn Engine>, ModelError> {
      loader_barrier.wait();
      Ok(Arc::new(RuleEngine::new(model)))
    });
  let registry = Arc::new(ModelRegistry::new(loader, RegistryConfig::default()));

  let en = {
    let registry = Arc::clone(&registry);
    tokio::spawn(async move { registry.get_or_load(LanguageCode::En.model_id()).await })
  };
  let fr = {
    let registry = Arc::clone(&registry);
    tokio::spawn(async move { registry.get_or_load(LanguageCode::Fr.model_id()).await })
  };

  let both = tokio::time::timeout(Duration::from_secs(10), async { (en.await, fr.await) })
    .await
    .expect("loads for different models were serialized");

  assert!(both.0.unwrap().is_ok());
  assert!(both.1.unwrap().is_ok());
  assert_eq!(registry.loaded_models().len(), 2);
}

#[tokio::test]
async fn failed_load_is_not_cached() {
  let loader = Arc::new(FlakyLoader {
    failures: 1,
    calls: AtomicUsize::new(0),
  });
  let registry = ModelRegistry::new(loader.clone(), RegistryConfig::default());
  let model = LanguageCode::De.model_id();

  let err = registry.get_or_load(model).await.err().expect("first load should fail");
  match err {
    RegistryError::ModelLoad { model: failed, source } => {
      assert_eq!(failed, model);
      assert!(matches!(source, ModelError::LoadFailed { .. }));
    }
    other => panic!("expected ModelLoad, got {other:?}"),
  }
  assert!(registry.loaded_models().is_empty());

  // Retried, then cached
  let first = registry.get_or_load(model).await.expect("retry should succeed");
  let second = registry.get_or_load(model).await.expect("cached");
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timed_out_callers_join_the_running_load() {
  let in_flight = Arc::new(AtomicUsize::new(0));
  let max_in_flight = Arc::new(AtomicUsize::new(0));
  let calls = Arc::new(AtomicUsize::new(0));

  let loader: Arc<dyn ModelLoader> = {
    let (in_flight, max_in_flight, calls) =
      (Arc::clone(&in_flight), Arc::clone(&max_in_flight), Arc::clone(&calls));
    Arc::new(move |model: ModelId| -> Result<Arc<dyn Engine>, ModelError> {
      calls.fetch_add(1, Ordering::SeqCst);
      let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
      max_in_flight.fetch_max(now, Ordering::SeqCst);
      std::thread::sleep(Duration::from_millis(300));
      in_flight.fetch_sub(1, Ordering::SeqCst);
      Ok(Arc::new(RuleEngine::new(model)))
    })
  };
  let config = RegistryConfig {
    load_timeout: Some(Duration::from_millis(50)),
    ..RegistryConfig::default()
  };
  let registry = ModelRegistry::new(loader, config);
  let model = LanguageCode::Ja.model_id();

  // Each caller gives up, but none of them starts a second load
  for _ in 0..3 {
    let err = registry.get_or_load(model).await.err().expect("load should time out");
    assert!(
      matches!(err, RegistryError::LoadTimeout { model: m, timeout } if m == model && timeout == Duration::from_millis(50))
    );
  }
  assert!(registry.loaded_models().is_empty());

  // The abandoned load still finishes and is cached
  tokio::time::sleep(Duration::from_millis(400)).await;
  assert_eq!(registry.loaded_models(), vec![model]);
  registry.get_or_load(model).await.expect("load finished in the background");

  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn retrying_after_timeouts_loads_once() {
  let loader = Arc::new(SlowLoader {
    delay: Duration::from_millis(200),
    calls: AtomicUsize::new(0),
  });
  let config = RegistryConfig {
    load_timeout: Some(Duration::from_millis(20)),
    ..RegistryConfig::default()
  };
  let registry = Arc::new(ModelRegistry::new(loader.clone(), config));
  let model = LanguageCode::Lt.model_id();

  // Callers that keep retrying after timeouts end up with the one engine being loaded
  let waiter = {
    let registry = Arc::clone(&registry);
    tokio::spawn(async move {
      loop {
        match registry.get_or_load(model).await {
          Ok(engine) => return engine,
          Err(RegistryError::LoadTimeout { .. }) => continue,
          Err(other) => panic!("unexpected error: {other:?}"),
        }
      }
    })
  };

  let engine = tokio::time::timeout(Duration::from_secs(10), waiter)
    .await
    .expect("load never finished")
    .expect("task panicked");
  assert_eq!(engine.model_id(), model);
  assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_language_never_reaches_loader() {
  let loader = Arc::new(SlowLoader {
    delay: Duration::ZERO,
    calls: AtomicUsize::new(0),
  });
  let registry = ModelRegistry::new(loader.clone(), RegistryConfig::default());

  let err = registry.resolve("xx-not-real").unwrap_err();
  assert!(err.to_string().contains("xx-not-real"));
  assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
  assert!(registry.loaded_models().is_empty());
}

#[tokio::test]
async fn analysis_failure_keeps_engine_cached() {
  struct FailingEngine(ModelId);

  impl Engine for FailingEngine {
    fn model_id(&self) -> ModelId {
      self.0
    }

    fn analyze(&self, _text: &str) -> Result<kaiseki::Document, ModelError> {
      Err(ModelError::AnalysisFailed {
        model: self.0,
        reason: "unsupported encoding".to_string(),
      })
    }
  }

  let calls = Arc::new(AtomicUsize::new(0));
  let loader_calls = Arc::clone(&calls);
  let loader: Arc<dyn ModelLoader> =
    Arc::new(move |model: ModelId| -> Result<Arc<dyn Engine>, ModelError> {
      loader_calls.fetch_add(1, Ordering::SeqCst);
      Ok(Arc::new(FailingEngine(model)))
    });
  let registry = ModelRegistry::new(loader, RegistryConfig::default());
  let model = LanguageCode::Pt.model_id();

  for _ in 0..3 {
    let engine = registry.get_or_load(model).await.unwrap();
    assert!(engine.analyze("Olá").is_err());
  }
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}
