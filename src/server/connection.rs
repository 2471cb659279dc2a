// Connection module
// Serves one accepted TCP connection through the dispatcher

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::http::ClientAddr;
use crate::logger;
use crate::pipeline::Dispatcher;

/// Per-connection HTTP settings
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    pub keep_alive: bool,
    /// Upper bound for the whole connection
    pub timeout: Duration,
}

impl From<&ServerConfig> for ConnectionOptions {
    fn from(config: &ServerConfig) -> Self {
        Self {
            keep_alive: config.keep_alive,
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

/// Serve `stream` on a spawned task.
///
/// Request bodies are dropped before dispatch; handlers only see the head.
pub fn spawn_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    options: ConnectionOptions,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<hyper::body::Incoming>| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                let (mut parts, _body) = req.into_parts();
                parts.extensions.insert(ClientAddr(peer_addr));
                let response = dispatcher.handle(Request::from_parts(parts, ())).await;
                Ok::<_, Infallible>(response)
            }
        });

        let conn = http1::Builder::new()
            .keep_alive(options.keep_alive)
            .serve_connection(io, service);

        match tokio::time::timeout(options.timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {}s timeout",
                options.timeout.as_secs()
            )),
        }
    });
}
