//! Timestamped records stored in the two dictionary tables.
//!
//! Every write made to an [`LwwElementDict`](crate::LwwElementDict) is
//! captured as a record carrying the timestamp it was made at and the peer
//! that made it. Assignments also carry the written value; deletions carry
//! nothing else and act as tombstones.

use core::cmp::Ordering;

/// A record stamped with a timestamp and the id of the originating peer.
///
/// The provided [`supersedes`](Stamped::supersedes) method is the single
/// winner rule used whenever two records compete for the same key, whether
/// they are two assignments, two deletions, or one of each.
pub trait Stamped {
    /// Totally ordered timestamp type.
    type Timestamp: Ord;
    /// Totally ordered peer id type, used only to break timestamp ties.
    type PeerId: Ord;

    /// When the record was created.
    fn timestamp(&self) -> &Self::Timestamp;

    /// The peer that created the record.
    fn peer_id(&self) -> &Self::PeerId;

    /// Returns `true` if `self` wins against `other`.
    ///
    /// The later timestamp wins. On equal timestamps the greater-or-equal
    /// peer id wins, so a record always supersedes an identical copy of
    /// itself.
    ///
    /// ```
    /// use lww_dict::{Assignment, Deletion, Stamped};
    ///
    /// let set = Assignment::new("alan", 1, "peer-a");
    /// let del = Deletion::new(1, "peer-b");
    ///
    /// assert!(del.supersedes(&set));
    /// assert!(!set.supersedes(&del));
    /// assert!(set.supersedes(&set));
    /// ```
    fn supersedes<R>(&self, other: &R) -> bool
    where
        R: Stamped<Timestamp = Self::Timestamp, PeerId = Self::PeerId> + ?Sized,
    {
        match self.timestamp().cmp(other.timestamp()) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.peer_id() >= other.peer_id(),
        }
    }
}

/// A write of `value` to a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment<V, T, P> {
    value: V,
    timestamp: T,
    peer_id: P,
}

impl<V, T, P> Assignment<V, T, P> {
    /// Create an assignment record.
    pub fn new(value: V, timestamp: T, peer_id: P) -> Self {
        Self {
            value,
            timestamp,
            peer_id,
        }
    }

    /// The assigned value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consume the record, returning the assigned value.
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<V, T: Ord, P: Ord> Stamped for Assignment<V, T, P> {
    type Timestamp = T;
    type PeerId = P;

    fn timestamp(&self) -> &T {
        &self.timestamp
    }

    fn peer_id(&self) -> &P {
        &self.peer_id
    }
}

/// A tombstone marking a key as removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deletion<T, P> {
    timestamp: T,
    peer_id: P,
}

impl<T, P> Deletion<T, P> {
    /// Create a deletion record.
    pub fn new(timestamp: T, peer_id: P) -> Self {
        Self { timestamp, peer_id }
    }
}

impl<T: Ord, P: Ord> Stamped for Deletion<T, P> {
    type Timestamp = T;
    type PeerId = P;

    fn timestamp(&self) -> &T {
        &self.timestamp
    }

    fn peer_id(&self) -> &P {
        &self.peer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_timestamp_wins() {
        let old = Assignment::new("old", 1, "z");
        let new = Assignment::new("new", 2, "a");

        assert!(new.supersedes(&old));
        assert!(!old.supersedes(&new));
    }

    #[test]
    fn tie_goes_to_higher_peer() {
        let a = Assignment::new("alan", 7, "peerA");
        let b = Assignment::new("anthea", 7, "peerB");

        assert!(b.supersedes(&a));
        assert!(!a.supersedes(&b));
    }

    #[test]
    fn identical_records_supersede_each_other() {
        let a = Deletion::new(3, 1u8);
        let b = a.clone();

        assert!(a.supersedes(&b));
        assert!(b.supersedes(&a));
        assert!(a.supersedes(&a));
    }

    #[test]
    fn deletion_competes_with_assignment() {
        let set = Assignment::new(10, 5, 2u32);
        let early = Deletion::new(4, 9u32);
        let late = Deletion::new(6, 0u32);

        assert!(set.supersedes(&early));
        assert!(late.supersedes(&set));
    }

    #[test]
    fn exactly_one_wins_when_records_differ() {
        let records = [
            Deletion::new(1, 'a'),
            Deletion::new(1, 'b'),
            Deletion::new(2, 'a'),
            Deletion::new(0, 'c'),
        ];

        for (i, a) in records.iter().enumerate() {
            for (j, b) in records.iter().enumerate() {
                if i != j {
                    assert_ne!(a.supersedes(b), b.supersedes(a));
                }
            }
        }
    }
}
