use glam::Vec3;
use rts_common::{TreeId, horizontal, horizontal_distance};
use rts_fsm::State;
use rts_kernel::Forest;

use crate::WorkerConfig;

/// The worker's own mutable data, separate from its state machine so the
/// states can borrow it while the machine is borrowed.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    /// Tree being walked to or chopped. Held by id only.
    pub current_target: Option<TreeId>,
    pub trees_felled: usize,
}

impl Agent {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            current_target: None,
            trees_felled: 0,
        }
    }
}

/// Everything a worker state may touch during one hook call.
pub struct WorkerContext<'a> {
    pub agent: &'a mut Agent,
    pub forest: &'a mut Forest,
    pub config: &'a WorkerConfig,
}

impl WorkerContext<'_> {
    /// Position of the current target, if it is still standing.
    fn target_position(&self) -> Option<Vec3> {
        let id = self.agent.current_target?;
        self.forest.get(id).map(|t| t.position())
    }
}

/// The worker's states. `Empty` is the placeholder the machine starts in.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerState {
    Empty,
    /// Nothing left to do. Has no automatic exit.
    Idle { idle_time: f32, since_report: f32 },
    /// Choose the nearest standing tree.
    PickTarget,
    /// Walk towards the target on the horizontal plane.
    Seek { since_report: f32 },
    /// Chop the target until `chop_duration` has accumulated.
    Act { chopped: f32, since_report: f32 },
}

impl WorkerState {
    pub fn idle() -> Self {
        Self::Idle {
            idle_time: 0.0,
            since_report: 0.0,
        }
    }

    pub fn seek() -> Self {
        Self::Seek { since_report: 0.0 }
    }

    pub fn act() -> Self {
        Self::Act {
            chopped: 0.0,
            since_report: 0.0,
        }
    }
}

/// Accumulate `dt` and report whether a periodic log line is due.
fn report_due(since: &mut f32, dt: f32, interval: f32) -> bool {
    *since += dt;
    if *since > interval {
        *since = 0.0;
        true
    } else {
        false
    }
}

/// The target disappeared under the worker. Forget it and pick again.
fn lost_target(ctx: &mut WorkerContext<'_>) -> WorkerState {
    tracing::warn!(target_id = ?ctx.agent.current_target, "target no longer standing");
    ctx.agent.current_target = None;
    WorkerState::PickTarget
}

impl State for WorkerState {
    type Context<'a> = WorkerContext<'a>;

    fn name(&self) -> &str {
        match self {
            Self::Empty => "empty",
            Self::Idle { .. } => "idle",
            Self::PickTarget => "pick_target",
            Self::Seek { .. } => "seek",
            Self::Act { .. } => "act",
        }
    }

    fn on_enter(&mut self, ctx: &mut WorkerContext<'_>) {
        match self {
            Self::Idle {
                idle_time,
                since_report,
            } => {
                *idle_time = 0.0;
                *since_report = 0.0;
            }
            Self::PickTarget => ctx.agent.current_target = None,
            Self::Act {
                chopped,
                since_report,
            } => {
                *chopped = 0.0;
                *since_report = 0.0;
            }
            Self::Empty | Self::Seek { .. } => {}
        }
    }

    fn on_update(&mut self, ctx: &mut WorkerContext<'_>, dt: f32) -> Option<Self> {
        let interval = ctx.config.report_interval;
        match self {
            Self::Empty => None,
            Self::Idle {
                idle_time,
                since_report,
            } => {
                *idle_time += dt;
                if report_due(since_report, dt, interval) {
                    tracing::debug!(idle_time = *idle_time, "worker is idle");
                }
                None
            }
            Self::PickTarget => {
                let nearest = ctx.forest.nearest_to(ctx.agent.position).map(|t| t.id());
                match nearest {
                    Some(id) => {
                        tracing::debug!(tree = %id.short(), "picked target");
                        ctx.agent.current_target = Some(id);
                        Some(Self::seek())
                    }
                    None => {
                        tracing::info!("no more trees");
                        Some(Self::idle())
                    }
                }
            }
            Self::Seek { since_report } => {
                let Some(target) = ctx.target_position() else {
                    return Some(lost_target(ctx));
                };
                let direction = horizontal(target - ctx.agent.position).normalize_or_zero();
                ctx.agent.position += direction * ctx.config.speed * dt;
                let remaining = horizontal_distance(ctx.agent.position, target);
                if remaining < ctx.config.arrival_threshold {
                    return Some(Self::act());
                }
                if report_due(since_report, dt, interval) {
                    tracing::debug!(remaining, "walking towards tree");
                }
                None
            }
            Self::Act {
                chopped,
                since_report,
            } => {
                let Some(id) = ctx.agent.current_target.filter(|id| ctx.forest.contains(*id))
                else {
                    return Some(lost_target(ctx));
                };
                if report_due(since_report, dt, interval) {
                    tracing::debug!(
                        "chopping tree: {:.1}/{:.1}",
                        *chopped,
                        ctx.config.chop_duration
                    );
                }
                *chopped += dt;
                if *chopped >= ctx.config.chop_duration {
                    ctx.forest.remove(id);
                    ctx.agent.current_target = None;
                    ctx.agent.trees_felled += 1;
                    tracing::info!(tree = %id.short(), remaining = ctx.forest.len(), "timber!");
                    return Some(Self::PickTarget);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_update(
        state: &mut WorkerState,
        agent: &mut Agent,
        forest: &mut Forest,
        dt: f32,
    ) -> Option<WorkerState> {
        let config = WorkerConfig::default();
        let mut ctx = WorkerContext {
            agent,
            forest,
            config: &config,
        };
        state.on_update(&mut ctx, dt)
    }

    #[test]
    fn pick_target_on_empty_forest_goes_idle() {
        let mut agent = Agent::new(Vec3::ZERO);
        let mut forest = Forest::new();
        let next = run_update(&mut WorkerState::PickTarget, &mut agent, &mut forest, 0.1);
        assert_eq!(next, Some(WorkerState::idle()));
        assert_eq!(agent.current_target, None);
    }

    #[test]
    fn pick_target_sets_nearest() {
        let mut agent = Agent::new(Vec3::ZERO);
        let mut forest = Forest::new();
        forest.plant(Vec3::new(2.0, 0.0, 0.0));
        forest.plant(Vec3::new(0.0, 0.0, 5.0));
        let near = forest.plant(Vec3::new(1.0, 0.0, 1.0));
        let next = run_update(&mut WorkerState::PickTarget, &mut agent, &mut forest, 0.1);
        assert_eq!(next, Some(WorkerState::seek()));
        assert_eq!(agent.current_target, Some(near));
    }

    #[test]
    fn seek_keeps_height() {
        let mut agent = Agent::new(Vec3::new(0.0, 2.5, 0.0));
        let mut forest = Forest::new();
        agent.current_target = Some(forest.plant(Vec3::new(4.0, 3.0, 0.0)));
        let next = run_update(&mut WorkerState::seek(), &mut agent, &mut forest, 0.5);
        assert_eq!(next, None);
        assert_eq!(agent.position, Vec3::new(0.5, 2.5, 0.0));
    }

    #[test]
    fn seek_on_top_of_target_arrives() {
        let mut agent = Agent::new(Vec3::new(1.0, 0.0, 1.0));
        let mut forest = Forest::new();
        agent.current_target = Some(forest.plant(Vec3::new(1.0, 9.0, 1.0)));
        let next = run_update(&mut WorkerState::seek(), &mut agent, &mut forest, 0.0);
        assert_eq!(next, Some(WorkerState::act()));
        assert!(agent.position.is_finite());
    }

    #[test]
    fn act_with_missing_target_repicks() {
        let mut agent = Agent::new(Vec3::ZERO);
        let mut forest = Forest::new();
        let id = forest.plant(Vec3::ZERO);
        agent.current_target = Some(id);
        forest.remove(id);
        let next = run_update(&mut WorkerState::act(), &mut agent, &mut forest, 1.0);
        assert_eq!(next, Some(WorkerState::PickTarget));
        assert_eq!(agent.current_target, None);
        assert_eq!(agent.trees_felled, 0);
    }

    #[test]
    fn idle_never_leaves_on_its_own() {
        let mut agent = Agent::new(Vec3::ZERO);
        let mut forest = Forest::new();
        let mut state = WorkerState::idle();
        for _ in 0..100 {
            assert_eq!(run_update(&mut state, &mut agent, &mut forest, 0.5), None);
        }
        assert!(matches!(state, WorkerState::Idle { idle_time, .. } if idle_time == 50.0));
    }

    #[test]
    fn report_due_fires_after_interval() {
        let mut since = 0.0;
        assert!(!report_due(&mut since, 0.6, 1.0));
        assert!(report_due(&mut since, 0.6, 1.0));
        assert_eq!(since, 0.0);
    }
}
