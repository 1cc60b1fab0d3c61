//! kaiseki crate example
//!
//! Analyzes a few texts through the model registry and prints the tokens.
//!
//! ```bash
//! cargo run -p kaiseki --example analyze
//! RUST_LOG=debug cargo run -p kaiseki --example analyze -- ja
//! ```

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use kaiseki::{BuiltinModelLoader, KaisekiResult, ModelRegistry, RegistryConfig};

/// (lang, text) pairs analyzed by default; `ja` needs the dictionary download
const SAMPLES: &[(&str, &str)] = &[
  ("en", "The quick brown foxes were running. \"Really?\" she asked."),
  ("de", "Die Katzen schlafen im Garten."),
  ("zh", "我爱北京天安门。"),
  ("ja", "東京タワーは東京の観光名所です。"),
];

#[tokio::main]
async fn main() -> KaisekiResult<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  // Optional language filter from the command line
  let only: Vec<String> = std::env::args().skip(1).collect();

  let registry = ModelRegistry::new(Arc::new(BuiltinModelLoader::default()), RegistryConfig::default());

  for (lang, text) in SAMPLES {
    if !only.is_empty() && !only.iter().any(|l| l == lang) {
      continue;
    }

    let model = registry.resolve(lang)?;
    let engine = registry.get_or_load(model).await?;
    let doc = engine.analyze(text)?;

    println!("=== {model} ===");
    println!("{text}");
    for token in &doc.tokens {
      println!(
        "  {:>3} [{:>3}, {:>3}) {:<12} pos={:<6} lemma={}",
        token.id, token.start, token.end, token.text, token.pos, token.lemma
      );
    }
    println!("  sentences: {:?}", doc.sents.iter().map(|s| (s.start, s.end)).collect::<Vec<_>>());
  }

  println!("loaded models: {:?}", registry.loaded_models());
  Ok(())
}
