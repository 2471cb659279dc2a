//! Crate-wide error type
//!
//! Errors here are initialization-time failures: bad configuration, invalid
//! source definitions, unorderable handler sets. Request-time failures never
//! surface as `Error`; they are converted into HTTP status codes by the dispatcher.

use crate::pipeline::Stage;
use thiserror::Error;

/// Boxed error returned by handler bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `before`/`after` constraints within one stage form a cycle
    #[error("circular dependency detected among {stage} handlers: {}", names.join(", "))]
    CircularDependency { stage: Stage, names: Vec<String> },

    #[error("invalid static source: {0}")]
    InvalidSource(String),

    #[error("invalid handler registration: {0}")]
    InvalidRegistration(String),

    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
