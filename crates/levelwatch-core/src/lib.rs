//! Levelwatch Core - Snapshot and milestone types, error handling

pub mod error;
pub mod float;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
