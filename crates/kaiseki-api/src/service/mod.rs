//! Service module

mod parse_service;

pub use parse_service::ParseService;
