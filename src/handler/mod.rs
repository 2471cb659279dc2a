//! Built-in pipeline handlers
//!
//! Request logging (PRE), static file serving (PROCESS) and access logging (POST).

pub mod access_log;
pub mod request_log;
pub mod static_files;

pub use access_log::AccessLogHandler;
pub use request_log::RequestLogHandler;
pub use static_files::StaticHandler;
