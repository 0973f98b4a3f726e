//! Finite-state-machine driver.
//!
//! # Invariants
//! - Exactly one state is active once the machine is initialized.
//! - A transition always runs `on_leave` of the outgoing state before
//!   `on_enter` of the incoming one, even when both are equal.
//! - Using a machine before `initialize` panics.

mod basic;
mod machine;

pub use basic::BasicState;
pub use machine::{State, StateMachine};
