//! Shared types for the rts worker simulation.
//!
//! # Invariants
//! - A `TreeId` is never reused for a different tree.
//! - Tree positions are fixed once the tree exists.

mod types;

pub use types::{Tree, TreeId, horizontal, horizontal_distance};
