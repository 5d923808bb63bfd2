//! Serve command: runs the HTTP server in the foreground.
//!
//! Wires the configured provider into a [`ScheduleService`], installs the
//! shutdown signal handler and serves until SIGTERM/SIGINT.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use dayledger_server::{
    HttpServer, RequestHandler, ScheduleService, SignalHandler, make_connection_handler,
};

use crate::config::AppConfig;
use crate::error::ClientResult;

/// Starts the server and blocks until a shutdown signal arrives.
pub async fn run(bind: Option<SocketAddr>, config: &AppConfig) -> ClientResult<()> {
    let provider = config.provider.build();
    info!(
        provider = provider.name(),
        path = %config.provider.path.display(),
        "Provider configured"
    );

    let service = Arc::new(ScheduleService::new(config.schedule_config(), provider)?);
    let handler = Arc::new(RequestHandler::new(service));

    let mut server_config = config.server.clone();
    if let Some(bind) = bind {
        server_config.bind = bind;
    }

    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener();

    let server = HttpServer::bind(server_config).await?;
    info!(addr = %server.local_addr()?, "Serving schedules");

    server
        .run_until_shutdown(
            make_connection_handler(handler),
            signal_handler.shutdown().wait(),
        )
        .await?;

    info!("Server stopped");
    Ok(())
}
