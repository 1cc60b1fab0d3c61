//! モデルモジュール
//!
//! レスポンスは `kaiseki::Document` をそのまま JSON にする。

mod request;

pub use kaiseki::Document;
pub use request::ParseRequest;
