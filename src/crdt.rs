/// State-based merge shared by replicated types.
///
/// Replicas are updated independently and reconciled by merging one
/// replica's state into another. Implementations must make the resulting
/// replicated state independent of how merges are ordered or repeated:
///
/// - **Commutativity:** `a.merge(b)` and `b.merge(a)` hold the same records
/// - **Associativity:** `(a.merge(b)).merge(c)` and `a.merge(b.merge(c))` agree
/// - **Idempotency:** merging the same state twice changes nothing further
///
/// The replica's own identity (for a dictionary, its owning peer id) is not
/// part of the replicated state and is never taken from `other`.
pub trait Crdt {
    /// Absorb `other`'s state into this replica, leaving `other` untouched.
    fn merge(&mut self, other: &Self);
}
