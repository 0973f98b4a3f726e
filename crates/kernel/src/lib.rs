//! World Kernel: the authoritative tree collection the worker scavenges.
//!
//! # Invariants
//! - No two trees share an identity.
//! - All removals flow through `Forest::remove` and produce an event.
//! - Removal is O(1) and does not preserve iteration order.

pub mod forest;

pub use forest::{Bounds, Forest, ForestError, ForestEvent, ForestSummary};
