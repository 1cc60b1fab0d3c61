//! kaiseki-api crate
//!
//! Web server exposing language-routed text analysis as an HTTP API.
//!
//! ## Endpoints
//! - `POST /<any path>` - Text analysis (`{"lang", "text"}` → Document)
//! - `GET /health` - Health Check
//!
//! ## Usage Example
//! ```bash
//! curl -X POST http://localhost:8000/ \
//!   -d '{"lang": "ja", "text": "東京タワーは東京の観光名所です"}'
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use errors::{ApiError, ApiErrorKind};
pub use models::ParseRequest;
pub use service::ParseService;
