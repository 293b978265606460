//! Error kinds surfaced at the fallible edges (config tags, colors, levels)
//!
//! The per-tick math never fails; everything that can go wrong is caught
//! while a level is being built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid shift axis: {0:?}")]
    InvalidAxis(String),

    #[error("invalid shift channel: {0:?}")]
    InvalidChannel(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("unknown shift target: {0:?}")]
    UnknownTarget(String),

    #[error("level parse error: {0}")]
    LevelParseError(String),
}

impl ErrorKind {
    pub fn level(msg: impl Into<String>) -> Self {
        ErrorKind::LevelParseError(msg.into())
    }
}

impl From<serde_json::Error> for ErrorKind {
    fn from(err: serde_json::Error) -> Self {
        ErrorKind::LevelParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ErrorKind>;
