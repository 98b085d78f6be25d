use std::sync::Arc;

use tokio::{sync::oneshot, task::JoinHandle, time};
use tracing::{debug, warn};

use crate::codec::Shared;

/// Background task flushing a codec's buffer after its previous timeout.
///
/// Only spawned when a timeout is configured. The task exits on an explicit
/// stop or when the owning codec is dropped (the stop sender goes away).
pub(crate) struct DeadlineTimer {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl DeadlineTimer {
    pub(crate) fn spawn(shared: Arc<Shared>) -> Self {
        let (stop, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(deadline_task(shared, stop_rx));
        Self { stop, handle }
    }

    /// Signals the task and waits for it to exit. No flush happens after this returns.
    pub(crate) async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(err) = self.handle.await {
            warn!("multiline deadline timer did not stop cleanly: {err}");
        }
    }
}

async fn deadline_task(shared: Arc<Shared>, mut stop: oneshot::Receiver<()>) {
    debug!("multiline deadline timer armed");

    loop {
        let deadline = shared.lock().deadline;
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    _ = time::sleep_until(deadline) => flush_if_due(&shared),
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = &mut stop => break,
                    _ = shared.wake.notified() => {}
                }
            }
        }
    }

    debug!("multiline deadline timer stopped");
}

fn flush_if_due(shared: &Shared) {
    let mut state = shared.lock();
    // A line may have pushed the deadline out between the wake and the lock.
    let due = state
        .deadline
        .is_some_and(|current| current <= time::Instant::now());
    if due {
        debug!("previous timeout elapsed; flushing idle buffer");
        state.flush();
        state.deadline = None;
    }
}
