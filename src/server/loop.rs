// Server loop module
// Accepts connections until the shutdown future completes

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::{spawn_connection, ConnectionOptions};
use crate::logger;
use crate::pipeline::Dispatcher;

/// Accept connections on `listener` and serve each through `dispatcher`.
///
/// Returns when `shutdown` resolves. Accept errors are logged and the loop
/// keeps running.
pub async fn run<S>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    options: ConnectionOptions,
    shutdown: S,
) where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        spawn_connection(stream, peer_addr, Arc::clone(&dispatcher), options);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_info("Server loop stopped");
                break;
            }
        }
    }
}
