//! 日本語モデルの統合テスト
//! tests/japanese_engine_test.rs
//!
//! 辞書のダウンロードが必要なため `with_dict_tests` feature で有効化する。
//!
//! ```bash
//! cargo test -p kaiseki --features with_dict_tests
//! ```
#![cfg(feature = "with_dict_tests")]

use std::sync::Arc;

use kaiseki::engine::Engine;
use kaiseki::{
  BuiltinModelLoader, DictionaryConfig, DictionaryPreset, LanguageCode, ModelRegistry,
  RegistryConfig,
};

fn ipadic_registry() -> ModelRegistry {
  let loader = BuiltinModelLoader::new(DictionaryConfig {
    preset: DictionaryPreset::Ipadic,
    ..DictionaryConfig::default()
  });
  ModelRegistry::new(Arc::new(loader), RegistryConfig::default())
}

/// 日本語テキストが文字オフセット付きのトークン列になることを確認。
#[tokio::test(flavor = "multi_thread")]
async fn analyze_japanese_sentence() {
  let registry = ipadic_registry();
  let model = registry.resolve("ja").expect("ja は登録済み");
  let engine = registry.get_or_load(model).await.expect("辞書ロード失敗");

  let text = "東京タワーは東京の観光名所です。";
  let doc = engine.analyze(text).expect("解析失敗");

  println!("トークン: {:?}", doc.token_texts());
  assert_eq!(doc.model, "ja_core_news_trf");
  assert!(doc.token_texts().contains(&"東京"));

  // 「東京の」の「東京」は文字位置 6 から
  let tokyo = doc.tokens.iter().rev().find(|t| t.text == "東京").expect("「東京」がない");
  assert_eq!((tokyo.start, tokyo.end), (6, 8));

  // 文字オフセットで部分文字列が取り出せること
  let chars: Vec<char> = text.chars().collect();
  for token in &doc.tokens {
    let slice: String = chars[token.start..token.end].iter().collect();
    assert_eq!(slice, token.text);
  }

  // 句点で文が閉じる
  assert_eq!(doc.sents.len(), 1);
  assert_eq!(doc.sents[0].end, text.chars().count());
}

/// 複数行のテキストでオフセットが行をまたいで連続することを確認。
#[tokio::test(flavor = "multi_thread")]
async fn analyze_multiline_offsets() {
  let registry = ipadic_registry();
  let engine = registry
    .get_or_load(LanguageCode::Ja.model_id())
    .await
    .expect("辞書ロード失敗");

  let doc = engine.analyze("猫です。\n犬です。").expect("解析失敗");

  let dog = doc.tokens.iter().find(|t| t.text == "犬").expect("「犬」がない");
  assert_eq!((dog.start, dog.end), (5, 6));
  assert_eq!(doc.sents.len(), 2);
}

/// 二回目の取得はキャッシュ済みのエンジンを返す。
#[tokio::test(flavor = "multi_thread")]
async fn japanese_engine_is_cached() {
  let registry = ipadic_registry();
  let model = LanguageCode::Ja.model_id();

  let first = registry.get_or_load(model).await.expect("辞書ロード失敗");
  let second = registry.get_or_load(model).await.expect("キャッシュ取得失敗");

  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(registry.loaded_models(), vec![model]);
}
