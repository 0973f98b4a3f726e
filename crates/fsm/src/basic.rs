use std::marker::PhantomData;

use crate::State;

/// A named state that only tracks how long it has been active and logs its
/// lifecycle. Handy for wiring up a new machine before its real states exist.
#[derive(Debug, Clone)]
pub struct BasicState<C = ()> {
    name: String,
    time_in_state: f32,
    _context: PhantomData<fn(&mut C)>,
}

impl<C> BasicState<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_in_state: 0.0,
            _context: PhantomData,
        }
    }

    /// Seconds accumulated since the state was last entered.
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }
}

impl<C> State for BasicState<C> {
    type Context<'a> = C;

    fn name(&self) -> &str {
        &self.name
    }

    fn on_enter(&mut self, _ctx: &mut C) {
        self.time_in_state = 0.0;
        tracing::info!(state = %self.name, "entering state");
    }

    fn on_update(&mut self, _ctx: &mut C, dt: f32) -> Option<Self> {
        self.time_in_state += dt;
        tracing::trace!(state = %self.name, time = self.time_in_state, "in state");
        None
    }

    fn on_leave(&mut self, _ctx: &mut C) {
        tracing::info!(state = %self.name, "leaving state");
    }
}
