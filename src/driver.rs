//! The driver module runs a [`Clock`] on a tokio runtime and broadcasts
//! its ticks to any number of listeners, like a hardware clock line.
use log::{debug, error, info};

use tokio::sync::{
    mpsc::Receiver,
    // Held for the whole of `start`, so only one task can run the driver.
    Mutex,
    // Listeners may subscribe while ticks are being broadcast.
    RwLock,
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::{Clock, Tick},
    error::{Error, ErrorKind},
    listener::TickListener,
};

/// A ClockDriver.
///
/// The driver has a single clock source. It can be started once at a time,
/// and broadcasts every tick of the clock to all registered listeners until
/// it is stopped through its [`CancellationToken`]. Once stopped it stays
/// stopped.
#[derive(Debug)]
pub struct ClockDriver {
    clock: Clock,

    /// Locked while the driver runs, so tasks can't start it twice.
    running: Mutex<bool>,

    /// Cancelled to stop the driver
    stopper: CancellationToken,

    listeners: RwLock<Vec<TickListener>>,
}

impl ClockDriver {
    /// Create a new driver for a clock
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use ticktock::{Clock, ClockDriver};
    ///
    /// // Drive a clock that ticks every two seconds
    /// let driver = ClockDriver::new(Clock::new(Duration::from_secs(2)));
    /// ```
    pub fn new(clock: Clock) -> ClockDriver {
        ClockDriver {
            clock,
            running: Mutex::new(false),
            stopper: CancellationToken::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// The clock being driven
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// A handle that stops the driver when cancelled.
    ///
    /// See [`stop_clock`].
    pub fn stopper(&self) -> CancellationToken {
        self.stopper.clone()
    }

    /// Whether the driver is currently broadcasting ticks.
    pub fn is_running(&self) -> bool {
        match self.running.try_lock() {
            Ok(running) => *running,
            Err(_) => true,
        }
    }

    /// Register a listener before the driver is shared.
    ///
    /// Returns the receiving end of a channel that gets every tick
    /// broadcast from now on.
    pub fn register(&mut self) -> Receiver<Tick> {
        info!("Registering tick listener");

        let (listener, rx) = TickListener::channel();
        self.listeners.get_mut().push(listener);
        rx
    }

    /// Register a listener on a shared, possibly running, driver.
    pub async fn subscribe(&self) -> Receiver<Tick> {
        info!("Subscribing tick listener");

        let (listener, rx) = TickListener::channel();
        self.listeners.write().await.push(listener);
        rx
    }

    /// Number of registered listeners
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// Send a tick to every listener.
    ///
    /// Listeners whose receiver was dropped are removed.
    pub async fn broadcast(&self, tick: Tick) {
        let mut closed = false;

        {
            let listeners = self.listeners.read().await;
            debug!("Broadcasting tick {} to {} listeners", tick.0, listeners.len());

            for listener in listeners.iter() {
                if let Err(e) = listener.notify(tick).await {
                    error!("Send error: {}", e);
                    closed |= listener.is_closed();
                }
            }
        }

        if closed {
            let mut listeners = self.listeners.write().await;
            listeners.retain(|listener| !listener.is_closed());
            info!("Dropped closed listeners, {} left", listeners.len());
        }
    }

    /// Start the driver
    ///
    /// Waits for each tick of the clock and broadcasts it to all
    /// listeners, until stopped. A stop request is noticed at every await
    /// point, so a tick that was reached but not yet sent out may be lost.
    ///
    /// If another task is already running this driver, returns a
    /// `ClockAlreadyRunning` error.
    ///
    /// # Returns
    ///
    /// The number of ticks broadcast.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use tokio::runtime;
    /// use ticktock::{driver::stop_clock, Clock, ClockDriver};
    ///
    /// let mut driver = ClockDriver::new(Clock::new(Duration::from_millis(10)));
    /// let mut ticks = driver.register();
    /// let stopper = driver.stopper();
    ///
    /// let rt = runtime::Builder::new_current_thread().enable_time().build().unwrap();
    ///
    /// let count = rt.block_on(async {
    ///     let run = tokio::spawn(async move { driver.start().await });
    ///
    ///     let (n, _at) = ticks.recv().await.unwrap();
    ///     assert!(n >= 1);
    ///
    ///     stop_clock(&stopper);
    ///     run.await.unwrap().unwrap()
    /// });
    /// assert!(count >= 1);
    /// ```
    pub async fn start(&self) -> Result<u64, Error> {
        let mut running = match self.running.try_lock() {
            Ok(r) => r,
            Err(_e) => {
                error!("Already started the clock");
                return Err(Error::new(ErrorKind::ClockAlreadyRunning));
            }
        };

        info!("Starting clock, tick length {:?}", self.clock.tick_len());
        *running = true;

        let mut sent = 0;
        while *running {
            tokio::select! {
                biased;

                _ = self.stopper.cancelled() => {
                    info!("Received message to stop clock");
                    *running = false;
                }

                tick = self.clock.tick() => {
                    tokio::select! {
                        biased;

                        _ = self.stopper.cancelled() => {
                            info!("Received message to stop clock");
                            *running = false;
                        }

                        _ = self.broadcast(tick) => {
                            sent += 1;
                        }
                    }
                }
            }
        }

        info!("Clock stopped after {} ticks", sent);
        Ok(sent)
    }
}

/// Stop the clock.
///
/// May be called from any task or thread holding the driver's stopper.
/// Stops the clock for all listeners; any further stop requests have no
/// effect. The running `start` call returns as soon as it reaches its next
/// await point.
pub fn stop_clock(stopper: &CancellationToken) {
    info!("Stopping the clock");
    stopper.cancel();
}
