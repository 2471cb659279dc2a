// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) request a graceful stop: the accept loop exits
// and in-flight connections finish on their own tasks.

/// Resolve once a shutdown signal arrives
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => crate::logger::log_info("SIGTERM received, shutting down"),
        _ = sigint.recv() => crate::logger::log_info("SIGINT received, shutting down"),
    }
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    crate::logger::log_info("Ctrl+C received, shutting down");
    Ok(())
}
