//! Data bridge: forwards dashboard snapshots to TUI actions.
//!
//! Runs as a background task: pushes the current snapshot immediately,
//! then one `SnapshotUpdated` per publish until cancelled or until the
//! dashboard goes away.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use citypulse_core::SnapshotStream;

use crate::action::Action;

pub async fn spawn_data_bridge(
    mut snapshots: SnapshotStream,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    // Push the initial snapshot so screens have data immediately
    let _ = action_tx.send(Action::SnapshotUpdated(snapshots.current().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            snapshot = snapshots.changed() => {
                let Some(snapshot) = snapshot else { break };
                if action_tx.send(Action::SnapshotUpdated(snapshot)).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge shut down");
}
