//! Observer pattern for simulation state inspection.
//!
//! Observers receive immutable snapshots after each tick and can never
//! affect simulation state, so determinism is preserved no matter what
//! is watching.
//!
//! ```ignore
//! let mut registry = ObserverRegistry::new();
//! registry.register(Box::new(EventLogObserver::to_writer(std::io::stdout())));
//!
//! // In the simulation loop, after step_sim:
//! let snapshot = Snapshot::new(state.clone(), tick);
//! registry.notify(&snapshot);
//! ```

pub mod event_log;

use crate::state::SimState;
use std::sync::Arc;
use thiserror::Error;

/// Immutable snapshot of simulation state for observers.
///
/// Wraps the state in `Arc`: zero-copy sharing between observers,
/// `Send + Sync`, and no `&mut` access possible.
#[derive(Clone)]
pub struct Snapshot {
    pub state: Arc<SimState>,
    /// Monotonic tick counter.
    pub tick: u64,
}

impl Snapshot {
    pub fn new(state: SimState, tick: u64) -> Self {
        Self {
            state: Arc::new(state),
            tick,
        }
    }

    pub fn from_arc(state: Arc<SimState>, tick: u64) -> Self {
        Self { state, tick }
    }
}

/// Errors that can occur during observation.
#[derive(Error, Debug)]
pub enum ObserverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Render error: {0}")]
    Render(String),
}

/// Configuration for observer notification frequency.
#[derive(Clone, Debug)]
pub struct ObserverConfig {
    /// Notify every N ticks (1 = every tick).
    pub frequency: u32,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { frequency: 1 }
    }
}

/// Trait for simulation observers.
///
/// Errors returned from `on_tick` are logged but do not block the
/// simulation; observers handle their own recovery.
pub trait SimObserver: Send + Sync {
    /// Called after each tick (or as configured by frequency).
    fn on_tick(&self, snapshot: &Snapshot) -> Result<(), ObserverError>;

    fn name(&self) -> &str;

    fn config(&self) -> ObserverConfig {
        ObserverConfig::default()
    }
}

/// Holds registered observers and fans snapshots out to them.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SimObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn SimObserver>) {
        tracing::debug!(observer = observer.name(), "registered observer");
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer whose frequency matches this tick.
    pub fn notify(&self, snapshot: &Snapshot) {
        for observer in &self.observers {
            let frequency = observer.config().frequency.max(1) as u64;
            if snapshot.tick % frequency != 0 {
                continue;
            }
            if let Err(e) = observer.on_tick(snapshot) {
                log::warn!("Observer {} failed: {}", observer.name(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingObserver {
        calls: Arc<AtomicU64>,
        frequency: u32,
    }

    impl SimObserver for CountingObserver {
        fn on_tick(&self, _snapshot: &Snapshot) -> Result<(), ObserverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "CountingObserver"
        }

        fn config(&self) -> ObserverConfig {
            ObserverConfig {
                frequency: self.frequency,
            }
        }
    }

    #[test]
    fn test_notify_respects_frequency() {
        let calls = Arc::new(AtomicU64::new(0));
        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(CountingObserver {
            calls: Arc::clone(&calls),
            frequency: 2,
        }));

        let state = SimState::new();
        for tick in 1..=4 {
            registry.notify(&Snapshot::new(state.clone(), tick));
        }

        // Ticks 2 and 4 fire; 1 and 3 are skipped
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failing_observer_does_not_block() {
        struct FailingObserver;
        impl SimObserver for FailingObserver {
            fn on_tick(&self, _snapshot: &Snapshot) -> Result<(), ObserverError> {
                Err(ObserverError::Render("boom".to_string()))
            }
            fn name(&self) -> &str {
                "FailingObserver"
            }
        }

        let mut registry = ObserverRegistry::new();
        registry.register(Box::new(FailingObserver));
        // Does not panic
        registry.notify(&Snapshot::new(SimState::new(), 1));
    }
}
