use alloc::collections::btree_map::{self, BTreeMap};
use core::borrow::Borrow;
use core::fmt;

use crate::clock::Clock;
use crate::record::{Assignment, Deletion, Stamped};
use crate::Crdt;

/// A last-write-wins element dictionary (LWW-Element-Dict).
///
/// Keeps two tables keyed by `K`: the winning assignment ever made to each
/// key and the winning deletion ever made to each key. A key is present when
/// it has an assignment that is not superseded by its deletion. Neither
/// table ever shrinks; deletions stay behind as tombstones.
///
/// Every local write is stamped with one reading of the dictionary's
/// [`Clock`] and its own `peer_id`. Conflicts between records for the same
/// key are decided by [`Stamped::supersedes`]: the later timestamp wins,
/// ties go to the greater peer id.
///
/// The type has no internal synchronization. Share it between threads only
/// behind an external lock.
///
/// # Example
///
/// ```
/// use lww_dict::prelude::*;
///
/// let mut a = LwwElementDict::new("peerA", Clock::fixed(7u64));
/// let mut b = LwwElementDict::new("peerB", Clock::fixed(7u64));
///
/// a.set("a", "alan");
/// b.set("a", "anthea");
///
/// // Same timestamp: "peerB" > "peerA" breaks the tie.
/// a.merge(&b);
/// assert_eq!(a.get("a"), Some(&"anthea"));
/// ```
pub struct LwwElementDict<K, V, T, P> {
    peer_id: P,
    clock: Clock<T>,
    assignments: BTreeMap<K, Assignment<V, T, P>>,
    deletions: BTreeMap<K, Deletion<T, P>>,
}

impl<K, V, T, P> LwwElementDict<K, V, T, P>
where
    K: Ord + Clone,
    V: Clone,
    T: Ord + Clone,
    P: Ord + Clone,
{
    /// Create an empty dictionary owned by `peer_id`.
    pub fn new(peer_id: P, clock: Clock<T>) -> Self {
        Self {
            peer_id,
            clock,
            assignments: BTreeMap::new(),
            deletions: BTreeMap::new(),
        }
    }

    /// Create an empty dictionary stamping writes with `timestamps`.
    pub fn with_timestamps<F>(peer_id: P, timestamps: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::new(peer_id, Clock::new(timestamps))
    }

    /// The peer owning this replica.
    #[must_use]
    pub fn peer_id(&self) -> &P {
        &self.peer_id
    }

    /// The clock stamping local writes.
    #[must_use]
    pub fn clock(&self) -> &Clock<T> {
        &self.clock
    }

    /// Get the value currently assigned to `key`.
    ///
    /// Returns `None` if the key was never assigned or its latest deletion
    /// supersedes its latest assignment. Use
    /// [`contains_key`](Self::contains_key) to test presence on its own.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.active(key).map(Assignment::value)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.active(key).is_some()
    }

    /// Assign `value` to `key`.
    ///
    /// The write is stamped with one fresh clock reading. If an existing
    /// assignment supersedes it, the write is dropped without error. Returns
    /// `true` if the write was recorded.
    pub fn set(&mut self, key: K, value: V) -> bool {
        let record = Assignment::new(value, self.clock.now(), self.peer_id.clone());
        let stored = offer(&mut self.assignments, key, record);
        if !stored {
            tracing::trace!("dropped assignment superseded by an existing record");
        }
        stored
    }

    /// Remove `key`.
    ///
    /// Records a tombstone even if the key was never assigned, so that an
    /// older assignment arriving later through [`merge`](Self::merge) stays
    /// hidden. Returns `true` if the tombstone was recorded.
    pub fn remove(&mut self, key: K) -> bool {
        let record = Deletion::new(self.clock.now(), self.peer_id.clone());
        let stored = offer(&mut self.deletions, key, record);
        if !stored {
            tracing::trace!("dropped deletion superseded by an existing tombstone");
        }
        stored
    }

    /// Snapshot of the present keys and their values.
    ///
    /// Rebuilt on every call.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<K, V> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Iterate over present keys and their values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.assignments
            .iter()
            .filter(move |(key, assignment)| self.is_live(*key, assignment))
            .map(|(key, assignment)| (key, assignment.value()))
    }

    /// Iterate over present keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no key is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Every winning assignment, including those hidden by a tombstone.
    #[must_use]
    pub fn assignments(&self) -> &BTreeMap<K, Assignment<V, T, P>> {
        &self.assignments
    }

    /// Every tombstone, including those for keys never assigned.
    #[must_use]
    pub fn deletions(&self) -> &BTreeMap<K, Deletion<T, P>> {
        &self.deletions
    }

    /// Absorb every record of `other` into this replica.
    ///
    /// For each key in each table, `other`'s record replaces ours when we
    /// have none or when it supersedes ours. `other` is left untouched.
    /// Every adopted timestamp is reported to our clock through
    /// [`Clock::observe`].
    pub fn merge(&mut self, other: &Self) {
        let assignments = absorb(&mut self.assignments, &other.assignments, &self.clock);
        let deletions = absorb(&mut self.deletions, &other.deletions, &self.clock);
        tracing::debug!(assignments, deletions, "merged replica state");
    }

    /// Compare the replicated state of two dictionaries.
    ///
    /// Unlike `==`, the owning peer ids are ignored; only the records in
    /// both tables are compared. Two replicas that have absorbed the same
    /// writes in any order are content-equal.
    #[must_use]
    pub fn content_eq(&self, other: &Self) -> bool
    where
        V: PartialEq,
    {
        self.assignments == other.assignments && self.deletions == other.deletions
    }

    fn active<Q>(&self, key: &Q) -> Option<&Assignment<V, T, P>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.assignments
            .get(key)
            .filter(|assignment| self.is_live(key, assignment))
    }

    // A tombstone tying the assignment exactly wins.
    fn is_live<Q>(&self, key: &Q, assignment: &Assignment<V, T, P>) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.deletions
            .get(key)
            .map_or(true, |deletion| !deletion.supersedes(assignment))
    }
}

fn offer<K: Ord, R: Stamped>(table: &mut BTreeMap<K, R>, key: K, record: R) -> bool {
    match table.entry(key) {
        btree_map::Entry::Vacant(slot) => {
            slot.insert(record);
            true
        }
        btree_map::Entry::Occupied(mut slot) => {
            if record.supersedes(slot.get()) {
                slot.insert(record);
                true
            } else {
                false
            }
        }
    }
}

fn absorb<K, R>(
    table: &mut BTreeMap<K, R>,
    other: &BTreeMap<K, R>,
    clock: &Clock<R::Timestamp>,
) -> usize
where
    K: Ord + Clone,
    R: Stamped + Clone,
{
    let mut adopted = 0;
    for (key, theirs) in other {
        match table.get_mut(key) {
            Some(ours) => {
                if theirs.supersedes(ours) {
                    ours.clone_from(theirs);
                    clock.observe(theirs.timestamp());
                    adopted += 1;
                }
            }
            None => {
                table.insert(key.clone(), theirs.clone());
                clock.observe(theirs.timestamp());
                adopted += 1;
            }
        }
    }
    adopted
}

impl<K, V, T, P> Crdt for LwwElementDict<K, V, T, P>
where
    K: Ord + Clone,
    V: Clone,
    T: Ord + Clone,
    P: Ord + Clone,
{
    fn merge(&mut self, other: &Self) {
        LwwElementDict::merge(self, other);
    }
}

impl<K, V, T, P> Clone for LwwElementDict<K, V, T, P>
where
    K: Clone,
    V: Clone,
    T: Clone,
    P: Clone,
{
    fn clone(&self) -> Self {
        Self {
            peer_id: self.peer_id.clone(),
            clock: self.clock.clone(),
            assignments: self.assignments.clone(),
            deletions: self.deletions.clone(),
        }
    }
}

impl<K, V, T, P> PartialEq for LwwElementDict<K, V, T, P>
where
    K: PartialEq,
    V: PartialEq,
    T: PartialEq,
    P: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.peer_id == other.peer_id
            && self.assignments == other.assignments
            && self.deletions == other.deletions
    }
}

impl<K: Eq, V: Eq, T: Eq, P: Eq> Eq for LwwElementDict<K, V, T, P> {}

impl<K, V, T, P> fmt::Debug for LwwElementDict<K, V, T, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
    T: fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LwwElementDict")
            .field("peer_id", &self.peer_id)
            .field("assignments", &self.assignments)
            .field("deletions", &self.deletions)
            .finish_non_exhaustive()
    }
}

/// Formats the present entries as `{key: value, ...}` in key order.
impl<K, V, T, P> fmt::Display for LwwElementDict<K, V, T, P>
where
    K: Ord + Clone + fmt::Display,
    V: Clone + fmt::Display,
    T: Ord + Clone,
    P: Ord + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

/// A dictionary stamped with wall-clock microseconds and owned by a random
/// UUID peer.
#[cfg(feature = "std")]
pub type WallClockDict<K, V> = LwwElementDict<K, V, u64, uuid::Uuid>;

#[cfg(feature = "std")]
impl<K: Ord + Clone, V: Clone> LwwElementDict<K, V, u64, uuid::Uuid> {
    /// Create an empty dictionary with a fresh v4 UUID peer id and the
    /// system wall clock.
    pub fn with_wall_clock() -> Self {
        Self::new(uuid::Uuid::new_v4(), Clock::wall())
    }
}
