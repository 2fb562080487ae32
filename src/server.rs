//! Server lifecycle: health signaling and graceful shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::{Result, StubError};
use crate::utils::shutdown_signal;

/// Serve `state` on `listener` until `shutdown` resolves.
///
/// The health flag is raised once the server is about to accept and is
/// lowered as soon as shutdown begins, before in-flight requests drain.
/// Draining longer than `grace` is reported as [`StubError::ShutdownTimeout`].
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let local_addr = listener.local_addr()?;
    let app = create_router(state.clone()).into_make_service_with_connect_info::<SocketAddr>();

    let stop = Arc::new(Notify::new());
    let stopping = stop.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { stopping.notified().await });

    state.set_healthy(true);
    info!("Server is ready to handle requests at {}", local_addr);
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        joined = &mut handle => {
            state.set_healthy(false);
            warn!("Server exited without a shutdown signal");
            joined??;
            return Ok(());
        }
        () = shutdown => {}
    }

    info!("Server is shutting down...");
    state.set_healthy(false);
    stop.notify_one();

    match tokio::time::timeout(grace, &mut handle).await {
        Ok(joined) => joined??,
        Err(_) => {
            error!("Could not gracefully shut down the server within {:?}", grace);
            handle.abort();
            return Err(StubError::ShutdownTimeout(grace));
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn run(config: &Config) -> Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    let state = AppState::from_config(config);

    serve(listener, state, shutdown_signal(), config.shutdown_timeout()).await
}
