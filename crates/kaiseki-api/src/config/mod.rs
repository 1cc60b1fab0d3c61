//! Config module

mod constants;
mod env;

pub use constants::{
  DEFAULT_ANALYSIS_TIMEOUT_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_LOAD_TIMEOUT_SECS, DEFAULT_PORT,
  DEFAULT_PRESET_DICT,
};
pub use env::Config;
