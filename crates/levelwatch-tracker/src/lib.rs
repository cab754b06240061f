//! Levelwatch Tracker — per-subsystem state history with level-leap milestones
//!
//! - `store`: HistoryStore (record, summarize, export, enable/disable)
//! - `detect`: last-pair milestone detection, strict threshold comparison
//! - `summary`: first/last trajectory summaries
//! - `export`: JSON export document I/O
//! - `config`: TOML configuration with defaults

pub mod config;
pub mod detect;
pub mod export;
pub mod store;
pub mod summary;

pub use config::TrackerConfig;
pub use store::HistoryStore;
