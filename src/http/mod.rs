//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! pipeline and from any specific handler.

pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{send, send_404_response, send_500_response, ResponseWriter, WriteError};

/// Peer address of the connection a request arrived on
///
/// Inserted into request extensions by the connection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientAddr(pub std::net::SocketAddr);
