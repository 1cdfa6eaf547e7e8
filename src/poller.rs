use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;

use crate::services::NotificationService;

/// Background task refreshing the unread notification count on a fixed interval.
///
/// The first fetch happens immediately. Counts are published into a shared
/// `watch` channel; the task is aborted when the poller is dropped.
pub struct UnreadCountPoller {
    handle: JoinHandle<()>,
    counts: Arc<watch::Sender<u64>>,
}

impl UnreadCountPoller {
    pub fn spawn(
        service: NotificationService,
        interval: Duration,
        counts: Arc<watch::Sender<u64>>,
    ) -> Self {
        let publish = counts.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match service.get_unread_count().await {
                    Ok(count) => {
                        publish.send_if_modified(|current| {
                            if *current == count {
                                false
                            } else {
                                *current = count;
                                true
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Failed to refresh unread count: {}", e);
                    }
                }
            }
        });

        tracing::debug!("Unread count polling every {:?}", interval);

        Self { handle, counts }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.counts.subscribe()
    }

    /// Count updates as a stream; yields the current value first.
    pub fn stream(&self) -> WatchStream<u64> {
        WatchStream::new(self.subscribe())
    }
}

impl Drop for UnreadCountPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
