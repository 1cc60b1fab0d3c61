//! registry module
pub mod model_registry;

/// 再エクスポート
pub use model_registry::ModelRegistry;
