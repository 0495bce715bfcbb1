//! Worker death is fatal: the process logs it, waits a grace period so the
//! log can flush, and exits.

use std::time::Duration;
use tokio::sync::oneshot;
use tracing::error;

/// Default delay between worker death and process exit.
pub const DEFAULT_DEATH_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerDeath {
    pub worker_id: String,
    pub reason: String,
}

/// Resolves `grace` after the worker dies. Never resolves if the engine is
/// dropped without the worker dying.
pub async fn await_worker_death(
    death_rx: oneshot::Receiver<WorkerDeath>,
    grace: Duration,
) -> WorkerDeath {
    let Ok(death) = death_rx.await else {
        return std::future::pending().await;
    };

    error!(
        "Media worker died, exiting in {:?} [worker:{}] {}",
        grace, death.worker_id, death.reason
    );
    tokio::time::sleep(grace).await;
    death
}
