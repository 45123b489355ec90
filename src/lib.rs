//! # lww-dict
//!
//! A last-write-wins element dictionary: a key/value CRDT that can be
//! replicated to independent peers, edited offline, and merged back in any
//! order, any number of times, always converging to the same contents.
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! lww-dict = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std`, [`Clock::wall`](clock::Clock::wall), the hybrid clock
//! helpers and [`WallClockDict`] are unavailable; supply your own timestamp
//! source with [`Clock::new`](clock::Clock::new).
//!
//! ## Quick Start
//!
//! ```
//! use lww_dict::prelude::*;
//!
//! let mut d1 = LwwElementDict::new("P1", Clock::logical());
//! d1.set("a", "alan");
//! d1.set("b", "bella");
//!
//! let mut d2 = d1.clone();
//! d2.remove("b");
//!
//! let mut left = d1.clone();
//! left.merge(&d2);
//! let mut right = d2.clone();
//! right.merge(&d1);
//!
//! assert!(left.content_eq(&right));
//! assert_eq!(left.to_string(), "{a: alan}");
//! ```
//!
//! ## How conflicts resolve
//!
//! Each key has at most one assignment record and one deletion record. A
//! record replaces another for the same key when it
//! [supersedes](Stamped::supersedes) it: later timestamp first, then greater
//! peer id. A key is present when its assignment is not superseded by its
//! deletion. Tombstones are never collected.
//!
//! ## Features
//!
//! - `std` (default): wall clock, hybrid logical clock and UUID peer ids
//! - `serde`: `Serialize`/`Deserialize` for records and hybrid timestamps
//! - `wasm`: JavaScript bindings via `wasm-bindgen`

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod crdt;
mod dict;
mod record;
#[cfg(feature = "wasm")]
mod wasm;

pub mod clock;
pub mod prelude;

pub use crdt::Crdt;
pub use dict::LwwElementDict;
#[cfg(feature = "std")]
pub use dict::WallClockDict;
pub use record::{Assignment, Deletion, Stamped};
#[cfg(feature = "std")]
pub use uuid::Uuid;
