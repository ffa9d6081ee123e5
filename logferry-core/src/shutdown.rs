use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Resolve once ctrl-c (or SIGTERM on unix) is received.
pub async fn wait_for_shutdown_signal() -> anyhow::Result<&'static str> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                Ok("SIGINT")
            }
            _ = term.recv() => Ok("SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

/// Spawn a task that cancels `cancel` on the first shutdown signal.
pub fn cancel_on_shutdown_signal(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            res = wait_for_shutdown_signal() => match res {
                Ok(signal) => {
                    tracing::info!(signal, "shutdown signal received");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "failed to install shutdown signal handler"),
            }
        }
    })
}
