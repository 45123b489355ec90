//! Integration tests verifying that replicas converge.
//!
//! Whatever order replicas are merged in, the resulting tables must hold the
//! same records.

use std::collections::BTreeMap;

use lww_dict::prelude::*;

type Dict = LwwElementDict<&'static str, &'static str, u64, &'static str>;

fn names(peer: &'static str, clock: Clock<u64>) -> Dict {
    let mut dict = Dict::new(peer, clock);
    dict.set("a", "alan");
    dict.set("b", "bella");
    dict.set("c", "carl");
    dict
}

#[test]
fn entries_reflect_sets_and_removes() {
    let mut dict = names("P1", Clock::logical());
    assert_eq!(
        dict.entries(),
        BTreeMap::from([("a", "alan"), ("b", "bella"), ("c", "carl")])
    );

    dict.remove("b");
    assert_eq!(dict.entries(), BTreeMap::from([("a", "alan"), ("c", "carl")]));
    assert_eq!(dict.get("b"), None);
    assert!(!dict.contains_key("b"));
}

#[test]
fn concurrent_set_tie_goes_to_higher_peer() {
    let mut a = Dict::new("peerA", Clock::fixed(9));
    let mut b = Dict::new("peerB", Clock::fixed(9));
    a.set("a", "alan");
    b.set("a", "anthea");

    let mut ab = a.clone();
    ab.merge(&b);
    let mut ba = b.clone();
    ba.merge(&a);

    assert_eq!(ab.get("a"), Some(&"anthea"));
    assert_eq!(ba.get("a"), Some(&"anthea"));
}

#[test]
fn foreign_remove_at_same_time_wins_tie() {
    let mut a = names("peerA", Clock::logical());
    let mut b = Dict::new("peerB", Clock::fixed(1));
    b.remove("b");

    a.merge(&b);
    assert_eq!(a.entries(), BTreeMap::from([("a", "alan"), ("c", "carl")]));
}

#[test]
fn preemptive_remove_suppresses_late_insert() {
    let mut remover = Dict::new("R", Clock::starting_at(10));
    remover.remove("k");

    let mut writer = Dict::new("W", Clock::starting_at(5));
    writer.set("k", "stale");

    remover.merge(&writer);
    assert!(!remover.contains_key("k"));

    writer.merge(&remover);
    assert!(!writer.contains_key("k"));
}

#[test]
fn later_insert_resurrects_removed_key() {
    let mut a = names("A", Clock::logical());
    a.remove("a");

    let mut b = Dict::new("B", Clock::starting_at(100));
    b.set("a", "ada");

    a.merge(&b);
    assert_eq!(a.get("a"), Some(&"ada"));
}

#[test]
fn opposite_merge_orders_are_content_equal() {
    let mut a = names("peerA", Clock::starting_at(0));
    a.remove("c");
    let mut b = Dict::new("peerB", Clock::starting_at(2));
    b.set("c", "cleo");
    b.remove("a");
    b.set("d", "dora");

    let mut ab = a.clone();
    ab.merge(&b);
    let mut ba = b.clone();
    ba.merge(&a);

    assert!(ab.content_eq(&ba));
    assert_ne!(ab, ba, "owning peers differ");
    assert_eq!(ab.entries(), ba.entries());
}

#[test]
fn three_way_convergence() {
    let mut a = Dict::new("a", Clock::starting_at(0));
    let mut b = Dict::new("b", Clock::starting_at(0));
    let mut c = Dict::new("c", Clock::starting_at(0));

    a.set("x", "from-a");
    b.set("x", "from-b");
    c.remove("x");
    c.set("y", "from-c");

    let mut order1 = a.clone();
    order1.merge(&b);
    order1.merge(&c);

    let mut order2 = c.clone();
    order2.merge(&a);
    order2.merge(&b);

    let mut order3 = b.clone();
    order3.merge(&c);
    order3.merge(&a);

    assert!(order1.content_eq(&order2));
    assert!(order2.content_eq(&order3));
    // c's tombstone at t=0 ties a and b, and "c" is the greatest peer.
    assert!(!order1.contains_key("x"));
    assert_eq!(order1.get("y"), Some(&"from-c"));
}

#[test]
fn repeated_merge_is_idempotent() {
    let a = names("A", Clock::logical());
    let mut b = Dict::new("B", Clock::starting_at(1));
    b.remove("a");
    b.set("z", "zed");

    b.merge(&a);
    let snapshot = b.clone();

    b.merge(&a);
    assert_eq!(b, snapshot, "Merge should be idempotent");

    b.merge(&a);
    assert_eq!(b, snapshot, "Merge should be idempotent (3rd time)");
}

#[test]
fn merge_through_crdt_trait() {
    fn sync<C: Crdt + Clone>(left: &C, right: &C) -> C {
        let mut merged = left.clone();
        merged.merge(right);
        merged
    }

    let a = names("A", Clock::logical());
    let mut b = Dict::new("B", Clock::starting_at(50));
    b.remove("c");

    let merged = sync(&a, &b);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.peer_id(), &"A");
}
