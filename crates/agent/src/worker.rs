use glam::Vec3;
use rts_common::TreeId;
use rts_fsm::StateMachine;
use rts_kernel::Forest;

use crate::{Agent, ConfigError, WorkerConfig, WorkerContext, WorkerState};

/// Coarse status for presentation: is the worker doing anything?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Busy,
    Idle,
}

/// A lumberjack agent.
///
/// A new worker is already in `PickTarget`; the `Empty` placeholder is left
/// during construction. From there it loops PickTarget → Seek → Act until the
/// forest is empty and it parks in Idle.
#[derive(Debug)]
pub struct Worker {
    agent: Agent,
    fsm: StateMachine<WorkerState>,
    config: WorkerConfig,
}

impl Worker {
    /// Create a worker at `position`, ready to pick from `forest` on its first
    /// tick. Fails if the config is invalid.
    pub fn new(
        position: Vec3,
        config: WorkerConfig,
        forest: &mut Forest,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(position, config, forest))
    }

    /// Create a worker with the default tunables.
    pub fn with_defaults(position: Vec3, forest: &mut Forest) -> Self {
        Self::start(position, WorkerConfig::default(), forest)
    }

    fn start(position: Vec3, config: WorkerConfig, forest: &mut Forest) -> Self {
        let mut worker = Self {
            agent: Agent::new(position),
            fsm: StateMachine::with_empty(WorkerState::Empty),
            config,
        };
        worker.pick_target(forest);
        worker
    }

    /// Advance the worker by one frame.
    ///
    /// `dt` must be finite and non-negative. It is not clamped: a huge `dt` can
    /// overshoot the arrival check or finish a chop in one call.
    pub fn tick(&mut self, dt: f32, forest: &mut Forest) {
        debug_assert!(
            dt.is_finite() && dt >= 0.0,
            "dt must be finite and non-negative, got {dt}"
        );
        let _span = tracing::trace_span!("worker_tick", dt).entered();
        let mut ctx = WorkerContext {
            agent: &mut self.agent,
            forest,
            config: &self.config,
        };
        self.fsm.tick(&mut ctx, dt);
    }

    /// Force the worker into `PickTarget`. This is the only way out of Idle,
    /// e.g. after new trees were planted.
    pub fn pick_target(&mut self, forest: &mut Forest) {
        let mut ctx = WorkerContext {
            agent: &mut self.agent,
            forest,
            config: &self.config,
        };
        self.fsm.change_state(&mut ctx, WorkerState::PickTarget);
    }

    pub fn position(&self) -> Vec3 {
        self.agent.position
    }

    pub fn current_target(&self) -> Option<TreeId> {
        self.agent.current_target
    }

    /// Position of the current target, if it is still standing.
    pub fn target_position(&self, forest: &Forest) -> Option<Vec3> {
        self.agent
            .current_target
            .and_then(|id| forest.get(id))
            .map(|t| t.position())
    }

    pub fn state(&self) -> Option<&WorkerState> {
        self.fsm.active()
    }

    pub fn state_name(&self) -> &str {
        self.fsm.active_name().unwrap_or("uninitialized")
    }

    pub fn status(&self) -> WorkerStatus {
        match self.fsm.active() {
            Some(WorkerState::Idle { .. }) => WorkerStatus::Idle,
            _ => WorkerStatus::Busy,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.status() == WorkerStatus::Busy
    }

    pub fn trees_felled(&self) -> usize {
        self.agent.trees_felled
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}
