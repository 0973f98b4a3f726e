//! Worker Agent: a single lumberjack driven by a finite-state machine.
//!
//! The host loop calls [`Worker::tick`] once per frame with the frame delta
//! and exclusive access to the [`Forest`](rts_kernel::Forest). The worker picks
//! the nearest tree, walks to it on the horizontal plane, chops it for a fixed
//! duration, removes it, and repeats until no trees remain.
//!
//! # Invariants
//! - The worker has a target only while seeking or chopping, and that target
//!   is still standing in the forest at the start of every tick.
//! - Only the worker removes trees.
//! - `dt` must be finite and non-negative; it is not clamped.

mod config;
mod state;
mod worker;

pub use config::{ConfigError, WorkerConfig};
pub use state::{Agent, WorkerContext, WorkerState};
pub use worker::{Worker, WorkerStatus};
