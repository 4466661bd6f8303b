//! Startup orchestration: datastore first, listener second, fail fast.
//!
//! DESIGN
//! ======
//! `start` runs a strictly ordered sequence against injected collaborators:
//! resolve the port, connect to the datastore, then activate the listener.
//! The listener is never touched unless the connection succeeded. Any
//! failure is reported once and ends in `exit(1)`; there are no retries.
//!
//! ```text
//! Initializing ──connect ok──► listen ok ──► Serving
//!      │                           │
//!      └──connect err──► Failed ◄──┘ listen err
//! ```

use tracing::{debug, error, info};

use crate::config;

/// Opaque failure cause surfaced by a collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Exit status used for every fatal startup failure.
pub const FAILURE_EXIT_CODE: i32 = 1;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The datastore could not be reached. Nothing was exposed.
    #[error("datastore connection failed: {0}")]
    Datastore(#[source] BoxError),

    /// The listener could not be activated after the datastore connected.
    #[error("listener activation failed on port {port}: {source}")]
    Listener {
        port: u16,
        #[source]
        source: BoxError,
    },
}

// =============================================================================
// COLLABORATOR CONTRACTS
// =============================================================================

/// Establishes the datastore connection. Enables substitution in tests.
#[async_trait::async_trait]
pub trait DatastoreConnector: Send + Sync {
    /// Whatever the serving side needs from a live connection.
    type Handle: Send + 'static;

    /// Connect once. Timeouts, if any, are the connector's business.
    ///
    /// # Errors
    ///
    /// Returns the underlying cause when the datastore is unreachable.
    async fn connect(&self) -> Result<Self::Handle, BoxError>;
}

/// Activates the network listener on a port.
#[async_trait::async_trait]
pub trait RequestServer<H: Send + 'static>: Send + Sync {
    /// Handle to the running server, owned by the caller after startup.
    type Running: Send;

    /// Bind and start serving in the background. Does not wait for traffic.
    ///
    /// # Errors
    ///
    /// Returns the underlying cause when the listener cannot be bound.
    async fn listen(&self, port: u16, datastore: H) -> Result<Self::Running, BoxError>;
}

/// Operator-visible diagnostic channel.
pub trait Diagnostics: Send + Sync {
    fn serving(&self, port: u16);
    fn failed(&self, error: &StartupError);
}

/// Process termination.
pub trait Exit: Send + Sync {
    fn exit(&self, code: i32);
}

/// Diagnostics written through `tracing`.
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn serving(&self, port: u16) {
        info!(%port, "listening at http://localhost:{port}");
    }

    fn failed(&self, error: &StartupError) {
        error!(error = %error, "failed to start server");
    }
}

/// Terminates the real process.
pub struct ProcessExit;

impl Exit for ProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Serving,
    Failed,
}

#[derive(Debug)]
pub enum StartupOutcome<R> {
    Serving { port: u16, running: R },
    Failed(StartupError),
}

impl<R> StartupOutcome<R> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Serving { .. } => Phase::Serving,
            Self::Failed(_) => Phase::Failed,
        }
    }
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

/// Run the startup sequence.
///
/// With [`ProcessExit`] a failure never returns. With any other [`Exit`]
/// the `Failed` outcome is returned after `exit` has been called once.
pub async fn start<C, S, D, E>(
    port_source: Option<&str>,
    connector: &C,
    server: &S,
    diagnostics: &D,
    exit: &E,
) -> StartupOutcome<S::Running>
where
    C: DatastoreConnector,
    S: RequestServer<C::Handle>,
    D: Diagnostics + ?Sized,
    E: Exit + ?Sized,
{
    let port = config::resolve_port(port_source);
    debug!(phase = ?Phase::Initializing, %port, "startup begun");

    let handle = match connector.connect().await {
        Ok(handle) => handle,
        Err(cause) => return fail(StartupError::Datastore(cause), diagnostics, exit),
    };

    let running = match server.listen(port, handle).await {
        Ok(running) => running,
        Err(source) => return fail(StartupError::Listener { port, source }, diagnostics, exit),
    };

    diagnostics.serving(port);
    StartupOutcome::Serving { port, running }
}

fn fail<R, D, E>(error: StartupError, diagnostics: &D, exit: &E) -> StartupOutcome<R>
where
    D: Diagnostics + ?Sized,
    E: Exit + ?Sized,
{
    diagnostics.failed(&error);
    exit.exit(FAILURE_EXIT_CODE);
    StartupOutcome::Failed(error)
}

#[cfg(test)]
#[path = "startup_test.rs"]
mod tests;
