//! Staged HTTP request dispatcher with static file serving
//!
//! Requests flow through three handler stages: PRE (observe), PROCESS (first
//! handler to claim the request responds) and POST (always runs). Handlers in a
//! stage are ordered by their declared `before`/`after` constraints.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod pipeline;
pub mod server;

pub use error::{Error, Result};
pub use pipeline::Dispatcher;
