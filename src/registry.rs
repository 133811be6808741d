//! The monitor registry: one live monitor per visible button.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use promdeck_types::{ButtonId, Settings};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::display::Display;
use crate::fetch::MetricFetcher;
use crate::monitor::{Monitor, Renderer, DEFAULT_POLL_INTERVAL};

/// Default capacity of each monitor's settings queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Tunables applied to every monitor the registry starts.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Time between scheduled refreshes.
    pub poll_interval: Duration,
    /// Settings updates buffered per monitor before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Outcome of routing a settings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Queued for the button's monitor.
    Queued,
    /// The monitor's queue was full; the update was discarded.
    Dropped,
    /// No monitor is running for the button.
    NoMonitor,
}

/// Registry-side state of one running monitor.
///
/// Dropping the handle closes the monitor's settings channel.
struct MonitorHandle {
    generation: u64,
    cancel: CancellationToken,
    settings_tx: mpsc::Sender<Settings>,
}

impl MonitorHandle {
    fn stop(self) {
        self.cancel.cancel();
    }
}

#[derive(Default)]
struct Monitors {
    handles: HashMap<ButtonId, MonitorHandle>,
    next_generation: u64,
    #[cfg(test)]
    spawned: Vec<(ButtonId, CancellationToken)>,
}

/// Supervises the per-button monitors.
///
/// All three lifecycle operations take the same lock, hold it only for map
/// bookkeeping and never await while holding it. Cancelling a monitor and
/// removing it from the map happen in the same critical section, so once an
/// identity is gone from the map nothing can send to its old monitor.
///
/// Must be used from within a tokio runtime: [`on_appear`](Self::on_appear)
/// spawns the monitor task.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use promdeck::{Display, MonitorOptions, MonitorRegistry, PrometheusFetcher};
/// use promdeck_types::{ButtonId, Coordinates, Settings};
///
/// # fn display() -> Arc<dyn Display> { unimplemented!() }
/// # tokio_test::block_on(async {
/// let fetcher = Arc::new(PrometheusFetcher::new(Duration::from_secs(10)).unwrap());
/// let registry = MonitorRegistry::new(fetcher, display(), MonitorOptions::default());
///
/// let id = ButtonId::from(Coordinates::new(0, 2));
/// registry.on_appear(id.clone(), "context-from-host", Settings::default());
/// registry.on_settings_changed(&id, Settings::default());
/// registry.on_disappear(&id);
/// # });
/// ```
pub struct MonitorRegistry {
    monitors: Mutex<Monitors>,
    fetcher: Arc<dyn MetricFetcher>,
    display: Arc<dyn Display>,
    options: MonitorOptions,
}

impl MonitorRegistry {
    pub fn new(
        fetcher: Arc<dyn MetricFetcher>,
        display: Arc<dyn Display>,
        options: MonitorOptions,
    ) -> Self {
        Self {
            monitors: Mutex::new(Monitors::default()),
            fetcher,
            display,
            options,
        }
    }

    /// A button became visible.
    ///
    /// Replaces any monitor already running for `id`, then starts a new one
    /// that renders to `context` and begins with `settings`. Returns the new
    /// monitor's generation.
    pub fn on_appear(&self, id: ButtonId, context: impl Into<String>, settings: Settings) -> u64 {
        let mut monitors = self.monitors.lock();

        if let Some(old) = monitors.handles.remove(&id) {
            debug!(button = %id, generation = old.generation, "Replacing monitor");
            old.stop();
        }

        let generation = monitors.next_generation;
        monitors.next_generation += 1;

        let (settings_tx, settings_rx) = mpsc::channel(self.options.queue_capacity);
        if settings_tx.try_send(settings).is_err() {
            debug!(button = %id, "Initial settings not queued");
        }

        let cancel = CancellationToken::new();
        let monitor = Monitor {
            renderer: Renderer {
                fetcher: self.fetcher.clone(),
                display: self.display.clone(),
                context: Arc::from(context.into()),
                cancel: cancel.clone(),
            },
            settings_rx,
            poll_interval: self.options.poll_interval,
        };
        monitor.spawn(&id, generation);
        #[cfg(test)]
        monitors.spawned.push((id.clone(), cancel.clone()));

        monitors.handles.insert(
            id,
            MonitorHandle {
                generation,
                cancel,
                settings_tx,
            },
        );
        generation
    }

    /// A button's settings were edited. Never blocks.
    pub fn on_settings_changed(&self, id: &ButtonId, settings: Settings) -> Delivery {
        let monitors = self.monitors.lock();

        let Some(handle) = monitors.handles.get(id) else {
            info!(button = %id, "Settings received with no monitor");
            return Delivery::NoMonitor;
        };

        match handle.settings_tx.try_send(settings) {
            Ok(()) => Delivery::Queued,
            Err(TrySendError::Full(_)) => {
                warn!(button = %id, "Settings queue full, dropping update");
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => {
                warn!(button = %id, "Monitor no longer receiving settings");
                Delivery::Dropped
            }
        }
    }

    /// A button went away. Returns whether a monitor was stopped.
    pub fn on_disappear(&self, id: &ButtonId) -> bool {
        let mut monitors = self.monitors.lock();
        match monitors.handles.remove(id) {
            Some(handle) => {
                debug!(button = %id, generation = handle.generation, "Stopping monitor");
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stop every monitor. Returns how many were running.
    pub fn shutdown(&self) -> usize {
        let mut monitors = self.monitors.lock();
        let count = monitors.handles.len();
        monitors.handles.drain().for_each(|(_, handle)| handle.stop());
        count
    }

    /// Number of running monitors.
    pub fn len(&self) -> usize {
        self.monitors.lock().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &ButtonId) -> bool {
        self.monitors.lock().handles.contains_key(id)
    }

    /// Generation of the monitor currently serving `id`.
    ///
    /// Generations increase with every monitor this registry starts, so a
    /// changed value means the monitor was replaced.
    pub fn generation(&self, id: &ButtonId) -> Option<u64> {
        self.monitors.lock().handles.get(id).map(|h| h.generation)
    }

    /// Monitors ever spawned for `id` whose token is not yet cancelled.
    #[cfg(test)]
    fn live_monitors(&self, id: &ButtonId) -> usize {
        self.monitors
            .lock()
            .spawned
            .iter()
            .filter(|(spawned, cancel)| spawned == id && !cancel.is_cancelled())
            .count()
    }
}

impl Drop for MonitorRegistry {
    fn drop(&mut self) {
        for (_, handle) in self.monitors.get_mut().handles.drain() {
            handle.stop();
        }
    }
}

impl fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("monitors", &self.len())
            .field("options", &self.options)
            .finish()
    }
}
