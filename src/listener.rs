//! Tick listeners that get notified when a driven clock ticks
#![warn(missing_docs)]
#![warn(unsafe_code)]
use tokio::sync::mpsc::{channel as bounded, error::SendTimeoutError, Receiver, Sender};

use crate::{clock::Tick, time::Duration};

/// Capacity of each listener's tick channel.
pub const LISTENER_CAPACITY: usize = 100;

/// How long a single tick send may wait on a full listener channel.
pub const SEND_TIMEOUT: Duration = Duration::from_millis(100);

/// A TickListener represents an individual subscriber to clock ticks.
#[derive(Debug)]
pub struct TickListener {
    /// The transmit channel to use to send ticks to the listener
    tx: Sender<Tick>,
}

impl TickListener {
    /// Create a listener and the receiving end handed to the subscriber.
    pub fn channel() -> (TickListener, Receiver<Tick>) {
        let (tx, rx) = bounded(LISTENER_CAPACITY);
        (TickListener { tx }, rx)
    }

    /// Send a tick to the listener, waiting at most [`SEND_TIMEOUT`] for
    /// room in the channel.
    pub async fn notify(&self, tick: Tick) -> Result<(), SendTimeoutError<Tick>> {
        self.tx.send_timeout(tick, SEND_TIMEOUT).await
    }

    /// Whether the receiving end was dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::TickListener;
    use crate::time::Instant;
    use tokio::runtime;

    #[test]
    fn notify_and_close() {
        let rt = runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();

        rt.block_on(async {
            let (listener, mut rx) = TickListener::channel();
            let tick = (1, Instant::now());

            listener.notify(tick).await.unwrap();
            assert_eq!(rx.recv().await, Some(tick));
            assert!(!listener.is_closed());

            drop(rx);
            assert!(listener.is_closed());
            assert!(listener.notify(tick).await.is_err());
        });
    }
}
