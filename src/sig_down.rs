//! Process shutdown signals.
//!
//! Listeners are registered in [`SigDown::try_new`], so a signal delivered any time
//! after that call is caught rather than killing the process.

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Registered Ctrl+C (and SIGTERM on unix) listeners.
pub struct SigDown {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl SigDown {
    /// Install the listeners. Must be called from within the tokio runtime.
    #[cfg(unix)]
    pub fn try_new() -> io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(windows)]
    pub fn try_new() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    #[cfg(not(any(unix, windows)))]
    pub fn try_new() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Resolves once the process is asked to stop.
    pub async fn recv(self) {
        self.wait().await;
        tracing::debug!("Shutdown signal received");
    }

    #[cfg(unix)]
    async fn wait(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {},
            _ = self.terminate.recv() => {},
        }
    }

    #[cfg(windows)]
    async fn wait(mut self) {
        self.ctrl_c.recv().await;
    }

    #[cfg(not(any(unix, windows)))]
    async fn wait(self) {
        std::future::pending::<()>().await;
    }
}
