//! Core types for Chatline: the rule table, transcript entries, runtime
//! settings and the file-backed history store.

pub mod config;
pub mod error;
pub mod model;
pub mod storage;

pub use error::{ConfigError, CoreError};
