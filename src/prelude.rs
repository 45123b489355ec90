//! Convenient re-exports for common usage.
//!
//! ```
//! use lww_dict::prelude::*;
//! ```

pub use crate::clock::Clock;
pub use crate::Crdt;
pub use crate::LwwElementDict;
pub use crate::Stamped;
#[cfg(feature = "std")]
pub use crate::WallClockDict;
