//! Timestamp sources for stamping local writes.
//!
//! A dictionary asks its [`Clock`] for exactly one timestamp per `set` or
//! `remove`. The clock is a shared handle around any zero-argument
//! callable, so a wall clock, a hybrid logical clock, or a plain counter in
//! tests can all be plugged in the same way.
//!
//! # Example
//!
//! ```
//! use lww_dict::clock::Clock;
//!
//! let clock = Clock::logical();
//! assert_eq!(clock.now(), 0);
//! assert_eq!(clock.now(), 1);
//!
//! // Clones share the same source.
//! let shared = clock.clone();
//! assert_eq!(shared.now(), 2);
//! assert_eq!(clock.now(), 3);
//! ```

use alloc::sync::Arc;
use core::cmp;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// A shared source of timestamps.
///
/// Cloning a `Clock` does not copy the underlying source: both handles keep
/// drawing from it. A clock may also carry an observer that is shown every
/// foreign timestamp a dictionary adopts during a merge, so sources such as
/// a hybrid logical clock can move past them.
pub struct Clock<T> {
    source: Arc<dyn Fn() -> T + Send + Sync>,
    observer: Option<Arc<dyn Fn(&T) + Send + Sync>>,
}

impl<T> Clock<T> {
    /// Wrap a callable as a clock.
    pub fn new<F>(source: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(source),
            observer: None,
        }
    }

    /// Wrap a callable as a clock that is told about merged timestamps.
    pub fn with_observer<F, O>(source: F, observer: O) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        O: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(source),
            observer: Some(Arc::new(observer)),
        }
    }

    /// A clock that always reports `timestamp`.
    ///
    /// Every write stamped by it ties with every other, leaving the peer id
    /// to decide conflicts.
    pub fn fixed(timestamp: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::new(move || timestamp.clone())
    }

    /// Read the next timestamp.
    pub fn now(&self) -> T {
        (self.source)()
    }

    /// Report a timestamp produced elsewhere.
    ///
    /// No-op unless the clock was built with an observer.
    pub fn observe(&self, timestamp: &T) {
        if let Some(observer) = &self.observer {
            observer(timestamp);
        }
    }

    /// Returns `true` if both handles draw from the same source.
    #[must_use]
    pub fn same_source(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl Clock<u64> {
    /// A logical counter starting at zero, advanced on every read.
    pub fn logical() -> Self {
        Self::starting_at(0)
    }

    /// A logical counter whose first reading is `start`.
    pub fn starting_at(start: u64) -> Self {
        let counter = AtomicU64::new(start);
        Self::new(move || counter.fetch_add(1, Ordering::Relaxed))
    }

    /// Microseconds since the Unix epoch, read from the system clock.
    #[cfg(feature = "std")]
    pub fn wall() -> Self {
        Self::new(wall_micros)
    }
}

#[cfg(feature = "std")]
impl Clock<HybridTimestamp> {
    /// A hybrid logical clock for `node_id`, backed by system time.
    pub fn hybrid(node_id: u16) -> Self {
        Self::from_hybrid(HybridClock::new(node_id))
    }

    /// Drive an existing [`HybridClock`].
    ///
    /// Observed timestamps are folded in with [`HybridClock::receive`], so
    /// a write made after merging a peer that runs ahead still wins.
    pub fn from_hybrid(clock: HybridClock) -> Self {
        let clock = Arc::new(std::sync::Mutex::new(clock));
        let receiver = Arc::clone(&clock);
        Self::with_observer(
            move || {
                clock
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .now()
            },
            move |remote| {
                receiver
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .receive(remote);
            },
        )
    }
}

impl<T> Clone for Clock<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            observer: self.observer.clone(),
        }
    }
}

impl<T> fmt::Debug for Clock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

#[cfg(feature = "std")]
fn wall_micros() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

#[cfg(feature = "std")]
fn wall_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A timestamp produced by a [`HybridClock`].
///
/// Ordered by physical time, then the logical counter, then the node id, so
/// two nodes never produce equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridTimestamp {
    /// Physical time in milliseconds.
    pub physical: u64,
    /// Counter for events within the same physical millisecond.
    pub logical: u16,
    /// Node that produced the timestamp.
    pub node_id: u16,
}

impl HybridTimestamp {
    /// The smallest timestamp.
    pub const ZERO: Self = Self {
        physical: 0,
        logical: 0,
        node_id: 0,
    };
}

impl Ord for HybridTimestamp {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.physical
            .cmp(&other.physical)
            .then(self.logical.cmp(&other.logical))
            .then(self.node_id.cmp(&other.node_id))
    }
}

impl PartialOrd for HybridTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Hybrid logical clock for a single node.
///
/// Readings never go backward, even when the physical source does: a stalled
/// or rewound physical clock only advances the logical counter.
#[derive(Debug)]
pub struct HybridClock {
    node_id: u16,
    last: HybridTimestamp,
    physical_time_fn: fn() -> u64,
}

impl HybridClock {
    /// Create a clock reading system time in milliseconds.
    #[cfg(feature = "std")]
    pub fn new(node_id: u16) -> Self {
        Self::with_time_source(node_id, wall_millis)
    }

    /// Create a clock with a custom physical time source in milliseconds.
    pub fn with_time_source(node_id: u16, time_fn: fn() -> u64) -> Self {
        Self {
            node_id,
            last: HybridTimestamp::ZERO,
            physical_time_fn: time_fn,
        }
    }

    /// Produce a timestamp for a local event.
    pub fn now(&mut self) -> HybridTimestamp {
        let pt = (self.physical_time_fn)();
        if pt > self.last.physical {
            self.advance(pt, 0)
        } else {
            self.tick(self.last.physical, self.last.logical)
        }
    }

    /// Fold a remote timestamp into the clock.
    ///
    /// The result is greater than both the previous local reading and
    /// `remote`.
    pub fn receive(&mut self, remote: &HybridTimestamp) -> HybridTimestamp {
        let pt = (self.physical_time_fn)();
        let physical = cmp::max(cmp::max(pt, self.last.physical), remote.physical);

        let local_match = physical == self.last.physical;
        let remote_match = physical == remote.physical;
        match (local_match, remote_match) {
            (true, true) => self.tick(physical, cmp::max(self.last.logical, remote.logical)),
            (true, false) => self.tick(physical, self.last.logical),
            (false, true) => self.tick(physical, remote.logical),
            (false, false) => self.advance(physical, 0),
        }
    }

    /// The node id stamped into every reading.
    pub fn node_id(&self) -> u16 {
        self.node_id
    }

    /// The most recent reading.
    pub fn last_timestamp(&self) -> HybridTimestamp {
        self.last
    }

    // A full logical counter carries into the next millisecond.
    fn tick(&mut self, physical: u64, logical: u16) -> HybridTimestamp {
        match logical.checked_add(1) {
            Some(next) => self.advance(physical, next),
            None => self.advance(physical.saturating_add(1), 0),
        }
    }

    fn advance(&mut self, physical: u64, logical: u16) -> HybridTimestamp {
        self.last = HybridTimestamp {
            physical,
            logical,
            node_id: self.node_id,
        };
        self.last
    }
}
