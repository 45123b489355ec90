//! Example: shared address book edited offline by two peers.

use lww_dict::prelude::*;

fn main() {
    println!("=== Address Book (LWW-Element-Dict) ===\n");

    // One clock stands in for loosely synchronized wall clocks.
    let clock = Clock::logical();
    let mut alice = LwwElementDict::new("alice", clock.clone());
    alice.set("ada", "ada@example.org");
    alice.set("bob", "bob@example.org");

    let mut bob = alice.clone();
    println!("Common ancestor: {alice}");

    // Both edit offline
    alice.remove("bob");
    alice.set("carl", "carl@example.org");
    bob.set("ada", "ada@work.example.org");
    bob.set("bob", "bob@new.example.org");

    println!("\n--- Concurrent edits ---");
    println!("Alice: {alice}");
    println!("Bob:   {bob}");

    let mut alice_view = alice.clone();
    alice_view.merge(&bob);
    let mut bob_view = bob.clone();
    bob_view.merge(&alice);

    println!("\n--- After sync ---");
    println!("Alice: {alice_view}");
    println!("Bob:   {bob_view}");
    println!("Converged: {}", alice_view.content_eq(&bob_view));

    // A tombstone written ahead of time hides a late, older insert.
    let mut late = LwwElementDict::new("late", Clock::starting_at(0));
    late.set("dora", "dora@example.org");
    alice_view.remove("dora");
    alice_view.merge(&late);
    println!("\nPreemptive delete keeps dora out: {alice_view}");
}
