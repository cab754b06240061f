//! Error types for Levelwatch

use crate::types::SystemId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("system already tracked: {0}")]
    AlreadyTracked(SystemId),

    #[error("milestones for {0} do not follow from its history")]
    InconsistentMilestones(SystemId),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(line: usize, source: serde_json::Error) -> Self {
        Self::Parse { line, source }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
