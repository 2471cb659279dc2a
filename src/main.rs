use std::sync::Arc;

use stagehand::config::Config;
use stagehand::handler::{AccessLogHandler, RequestLogHandler, StaticHandler};
use stagehand::pipeline::Dispatcher;
use stagehand::{logger, server};

/// Config file looked up when no path is given (extension optional)
const DEFAULT_CONFIG: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // Worker thread count follows the config, default is one per CPU core
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = Arc::new(build_dispatcher(&cfg)?);

    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = async {
        if let Err(e) = server::shutdown_signal().await {
            logger::log_error(&format!("Failed to install signal handlers: {e}"));
            std::future::pending::<()>().await;
        }
    };

    server::run(
        listener,
        dispatcher,
        server::ConnectionOptions::from(&cfg.server),
        shutdown,
    )
    .await;
    Ok(())
}

fn build_dispatcher(cfg: &Config) -> stagehand::Result<Dispatcher> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_handler(Arc::new(RequestLogHandler::new()))?;
    dispatcher.add_handler(Arc::new(StaticHandler::from_sources(&cfg.sources)?))?;
    if cfg.logging.access_log {
        dispatcher.add_handler(Arc::new(AccessLogHandler::new(
            cfg.logging.access_log_format.clone(),
        )))?;
    }
    dispatcher.order_handlers()?;
    Ok(dispatcher)
}
