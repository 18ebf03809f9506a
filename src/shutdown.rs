//! Process-level shutdown signal.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A token cancelled on the first Ctrl+C. Sessions should watch a child token.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                token.cancel();
            }
            Err(e) => warn!(error = %e, "unable to listen for interrupt"),
        }
    });
    shutdown
}
