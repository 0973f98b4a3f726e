/// One state of a [`StateMachine`].
///
/// Hooks receive the machine's context explicitly, so a state never holds a
/// reference back to its owner. A state asks for a transition by returning
/// the next state from `on_update`.
pub trait State: Sized {
    /// Data the hooks read and mutate (usually the owning agent plus
    /// whatever world state it borrows for the duration of a tick).
    type Context<'a>;

    /// Human-readable name for logs and debug overlays.
    fn name(&self) -> &str;

    fn on_enter(&mut self, _ctx: &mut Self::Context<'_>) {}

    /// Advance by `dt`. Returning `Some(next)` makes the machine change to `next`
    /// right after this call returns.
    fn on_update(&mut self, ctx: &mut Self::Context<'_>, dt: f32) -> Option<Self>;

    fn on_leave(&mut self, _ctx: &mut Self::Context<'_>) {}
}

/// Holds exactly one active state and sequences its lifecycle calls.
#[derive(Debug)]
pub struct StateMachine<S> {
    active: Option<S>,
    transitions: u64,
}

impl<S> Default for StateMachine<S> {
    fn default() -> Self {
        Self {
            active: None,
            transitions: 0,
        }
    }
}

impl<S: State> StateMachine<S> {
    /// Create an uninitialized machine. Call [`initialize`](Self::initialize)
    /// before ticking it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a machine already initialized with `empty`.
    pub fn with_empty(empty: S) -> Self {
        let mut fsm = Self::new();
        fsm.initialize(empty);
        fsm
    }

    /// Install a no-op placeholder as the active state.
    ///
    /// The placeholder's hooks are not called here; its `on_leave` runs on the
    /// first `change_state`.
    pub fn initialize(&mut self, empty: S) {
        self.active = Some(empty);
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// The active state, if initialized.
    pub fn active(&self) -> Option<&S> {
        self.active.as_ref()
    }

    /// Name of the active state, if initialized.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(|s| s.name())
    }

    /// Number of completed `change_state` calls.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Leave the active state, replace it with `next`, then enter `next`.
    ///
    /// # Panics
    /// If the machine was never initialized.
    pub fn change_state(&mut self, ctx: &mut S::Context<'_>, next: S) {
        let Some(active) = self.active.as_mut() else {
            panic!("StateMachine::change_state called before initialize");
        };
        active.on_leave(ctx);
        tracing::debug!(from = active.name(), to = next.name(), "state change");
        *active = next;
        active.on_enter(ctx);
        self.transitions += 1;
    }

    /// Run the active state's `on_update` once and apply the transition it asks for.
    ///
    /// # Panics
    /// If the machine was never initialized.
    pub fn tick(&mut self, ctx: &mut S::Context<'_>, dt: f32) {
        let Some(active) = self.active.as_mut() else {
            panic!("StateMachine::tick called before initialize");
        };
        if let Some(next) = active.on_update(ctx, dt) {
            self.change_state(ctx, next);
        }
    }
}
