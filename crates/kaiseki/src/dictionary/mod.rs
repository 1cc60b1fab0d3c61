//! dictionary module
pub mod dictionary_manager;

/// 再エクスポート
pub use dictionary_manager::{DictionaryManager, default_cache_dir};
