// Server module entry point
// Listener setup, accept loop and per-connection serving

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use connection::ConnectionOptions;
pub use listener::create_listener;
pub use server_loop::run;
pub use signal::shutdown_signal;
