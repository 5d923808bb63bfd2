//! Shutdown signal handling.
//!
//! SIGTERM and SIGINT (Ctrl+C elsewhere) stop the accept loop; requests
//! already being served run to completion in their own tasks.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A cloneable shutdown flag.
///
/// Every clone observes the same flag; any clone may raise it.
#[derive(Clone)]
pub struct ShutdownHandle {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Raises the flag. Idempotent.
    pub fn trigger(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.flag.borrow()
    }

    /// Returns a future-producing signal for this flag.
    pub fn wait(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.flag.subscribe(),
        }
    }
}

/// Completes once the shutdown flag is raised.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub async fn wait(mut self) {
        // Err only once every handle is gone.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Raises a [`ShutdownHandle`] when the process is asked to terminate.
#[derive(Default)]
pub struct SignalHandler {
    handle: ShutdownHandle,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the task that waits for a termination signal. Call once at
    /// startup, from inside the runtime.
    pub fn spawn_listener(&self) {
        let handle = self.handle.clone();
        tokio::spawn(async move {
            wait_for_termination().await;
            handle.trigger();
            debug!("Signal listener stopped");
        });
    }

    /// Returns a signal that completes on shutdown.
    pub fn shutdown(&self) -> ShutdownSignal {
        self.handle.wait()
    }

    pub fn is_shutdown(&self) -> bool {
        self.handle.is_shutdown()
    }

    /// Triggers shutdown without a signal.
    pub fn trigger_shutdown(&self) {
        self.handle.trigger();
    }

    /// Returns a handle other components can use to stop the server.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.handle.clone()
    }
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{SignalKind, signal};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut term), Ok(mut int)) => {
            tokio::select! {
                _ = term.recv() => info!("Received SIGTERM, initiating shutdown"),
                _ = int.recv() => info!("Received SIGINT, initiating shutdown"),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to install signal handlers, falling back to Ctrl+C");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating shutdown"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl+C; shutdown must be triggered programmatically");
            std::future::pending::<()>().await;
        }
    }
}
