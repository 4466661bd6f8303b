//! HTTP listener activation.
//!
//! DESIGN
//! ======
//! `listen` binds synchronously from the caller's point of view, then hands
//! the accept loop to a spawned task and returns. Request traffic is never
//! awaited here. The task stops on Ctrl-C, SIGTERM, or an explicit
//! [`ServerHandle::shutdown`], draining in-flight requests first.

use std::net::SocketAddr;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::routes;
use crate::startup::{BoxError, RequestServer};
use crate::state::AppState;

pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct HttpServer {
    host: String,
}

impl HttpServer {
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

#[async_trait]
impl RequestServer<PgPool> for HttpServer {
    type Running = ServerHandle;

    async fn listen(&self, port: u16, datastore: PgPool) -> Result<ServerHandle, BoxError> {
        let listener = TcpListener::bind((self.host.as_str(), port)).await?;
        let local_addr = listener.local_addr()?;
        let app = routes::app(AppState::new(datastore));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown_rx))
                .await?;
            info!("server stopped");
            Ok::<(), std::io::Error>(())
        });

        Ok(ServerHandle { local_addr, shutdown: Some(shutdown_tx), task })
    }
}

/// Handle to a background server task.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl ServerHandle {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the server task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if serving failed or the task panicked.
    pub async fn wait(self) -> Result<(), ServeError> {
        // Keep the sender alive so only OS signals stop the server.
        let _shutdown = self.shutdown;
        self.task.await??;
        Ok(())
    }

    /// Stop accepting connections, drain, and wait for the task.
    ///
    /// # Errors
    ///
    /// Returns an error if serving failed or the task panicked.
    pub async fn shutdown(mut self) -> Result<(), ServeError> {
        if let Some(tx) = self.shutdown.take() {
            if tx.send(()).is_err() {
                debug!("server task already stopped");
            }
        }
        self.task.await??;
        Ok(())
    }
}

async fn shutdown_signal(manual: oneshot::Receiver<()>) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // A dropped sender is not a shutdown request.
    let manual = async {
        if manual.await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => info!("received Ctrl-C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
        () = manual => info!("shutdown requested"),
    }
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
