#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure execution system that paces a run one instruction at a time.
//!
//! The world resolves each step; this system decides *when* the next step
//! happens. After every observed transition it waits one step delay of
//! simulated time, measured from [`Event::TimeAdvanced`], and then emits the
//! single command that continues the run. Every command is stamped with the
//! generation of the run it belongs to. Observing a newer
//! [`Event::RunStarted`] discards whatever was pending for the previous run.

use std::time::Duration;

use robot_maze_core::{Command, Event, RunGeneration, StepOutcome};

/// Delay between successive run transitions when none is configured.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_secs(1);

/// Continuation the system will emit once the step delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingAction {
    /// Execute the instruction at the provided index.
    Step(usize),
    /// Destroy the robot standing on a hazard.
    Destroy,
    /// Return the exhausted run to idle.
    Finish,
}

impl PendingAction {
    fn into_command(self, generation: RunGeneration) -> Command {
        match self {
            Self::Step(step) => Command::StepRobot { generation, step },
            Self::Destroy => Command::DestroyRobot { generation },
            Self::Finish => Command::FinishRun { generation },
        }
    }
}

/// Pure system that reacts to world events and emits run commands.
#[derive(Debug)]
pub struct Execution {
    step_delay: Duration,
    active: Option<ActiveRun>,
}

impl Execution {
    /// Creates an execution system that waits `step_delay` between transitions.
    #[must_use]
    pub const fn new(step_delay: Duration) -> Self {
        Self {
            step_delay,
            active: None,
        }
    }

    /// Generation of the run currently being paced, if any.
    #[must_use]
    pub fn active_generation(&self) -> Option<RunGeneration> {
        self.active.as_ref().map(|run| run.generation)
    }

    /// Continuation scheduled for the active run, if one is waiting on the delay.
    #[must_use]
    pub fn pending(&self) -> Option<PendingAction> {
        self.active.as_ref().and_then(|run| run.pending)
    }

    /// Consumes world events and emits the commands that continue the active run.
    ///
    /// Events are processed in order, so a tick that precedes a transition in
    /// the same batch does not count toward the delay that transition starts.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::RunStarted {
                    generation,
                    program,
                } => {
                    let pending = if program.is_empty() {
                        None
                    } else {
                        Some(PendingAction::Step(0))
                    };
                    self.active = Some(ActiveRun::new(*generation, program.len(), pending));
                }
                Event::RobotStepped {
                    generation,
                    step,
                    outcome,
                    ..
                } => {
                    let Some(run) = self.active_run_mut(*generation) else {
                        continue;
                    };
                    match outcome {
                        StepOutcome::Clear => {
                            let next = step + 1;
                            if next < run.program_len {
                                run.schedule(PendingAction::Step(next));
                            } else {
                                run.schedule(PendingAction::Finish);
                            }
                        }
                        StepOutcome::HazardHit { .. } => run.schedule(PendingAction::Destroy),
                        StepOutcome::GoalReached => self.active = None,
                    }
                }
                Event::RunFinished { generation, .. } => {
                    if self.active_generation() == Some(*generation) {
                        self.active = None;
                    }
                }
                Event::TimeAdvanced { dt } => {
                    let step_delay = self.step_delay;
                    if let Some(run) = self.active.as_mut() {
                        if let Some(action) = run.advance(*dt, step_delay) {
                            out.push(action.into_command(run.generation));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn active_run_mut(&mut self, generation: RunGeneration) -> Option<&mut ActiveRun> {
        self.active
            .as_mut()
            .filter(|run| run.generation == generation)
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

#[derive(Debug)]
struct ActiveRun {
    generation: RunGeneration,
    program_len: usize,
    pending: Option<PendingAction>,
    waited: Duration,
}

impl ActiveRun {
    fn new(generation: RunGeneration, program_len: usize, pending: Option<PendingAction>) -> Self {
        Self {
            generation,
            program_len,
            pending,
            waited: Duration::ZERO,
        }
    }

    fn schedule(&mut self, action: PendingAction) {
        self.pending = Some(action);
        self.waited = Duration::ZERO;
    }

    /// Accumulates time and releases the pending action once the delay elapsed.
    ///
    /// Nothing is pending again until the world reports the resulting
    /// transition, so at most one action is released per run transition.
    fn advance(&mut self, dt: Duration, step_delay: Duration) -> Option<PendingAction> {
        if self.pending.is_none() {
            return None;
        }

        self.waited = self.waited.saturating_add(dt);
        if self.waited < step_delay {
            return None;
        }

        self.waited = Duration::ZERO;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_maze_core::{CellCoord, Instruction, ObstacleKind, Program, RunOutcome};

    const DELAY: Duration = Duration::from_millis(100);

    fn program(len: usize) -> Program {
        std::iter::repeat(Instruction::Down).take(len).collect()
    }

    fn started(generation: u64, len: usize) -> Event {
        Event::RunStarted {
            generation: RunGeneration::new(generation),
            program: program(len),
        }
    }

    fn stepped(generation: u64, step: usize, outcome: StepOutcome) -> Event {
        Event::RobotStepped {
            generation: RunGeneration::new(generation),
            step,
            from: CellCoord::ORIGIN,
            to: CellCoord::ORIGIN,
            outcome,
        }
    }

    fn tick(dt: Duration) -> Event {
        Event::TimeAdvanced { dt }
    }

    #[test]
    fn first_step_waits_for_full_delay() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(&[started(1, 2), tick(DELAY / 2)], &mut commands);
        assert!(commands.is_empty());
        assert_eq!(execution.pending(), Some(PendingAction::Step(0)));

        execution.handle(&[tick(DELAY / 2)], &mut commands);
        assert_eq!(
            commands,
            vec![Command::StepRobot {
                generation: RunGeneration::new(1),
                step: 0,
            }]
        );
        assert_eq!(execution.pending(), None);
    }

    #[test]
    fn releases_one_action_until_world_responds() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[started(1, 3), tick(DELAY), tick(DELAY), tick(DELAY)],
            &mut commands,
        );

        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn clear_steps_schedule_next_then_finish() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(4, 2),
                tick(DELAY),
                stepped(4, 0, StepOutcome::Clear),
                tick(DELAY),
                stepped(4, 1, StepOutcome::Clear),
                tick(DELAY),
            ],
            &mut commands,
        );

        let generation = RunGeneration::new(4);
        assert_eq!(
            commands,
            vec![
                Command::StepRobot {
                    generation,
                    step: 0
                },
                Command::StepRobot {
                    generation,
                    step: 1
                },
                Command::FinishRun { generation },
            ]
        );
    }

    #[test]
    fn hazard_schedules_destruction_after_delay() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(2, 3),
                stepped(
                    2,
                    0,
                    StepOutcome::HazardHit {
                        kind: ObstacleKind::Fire,
                    },
                ),
                tick(DELAY - Duration::from_millis(1)),
            ],
            &mut commands,
        );
        assert!(commands.is_empty());
        assert_eq!(execution.pending(), Some(PendingAction::Destroy));

        execution.handle(&[tick(Duration::from_millis(1))], &mut commands);
        assert_eq!(
            commands,
            vec![Command::DestroyRobot {
                generation: RunGeneration::new(2),
            }]
        );
    }

    #[test]
    fn goal_ends_pacing_immediately() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(1, 5),
                stepped(1, 0, StepOutcome::GoalReached),
                tick(DELAY * 10),
            ],
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(execution.active_generation(), None);
    }

    #[test]
    fn empty_program_schedules_nothing() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(1, 0),
                Event::RunFinished {
                    generation: RunGeneration::new(1),
                    outcome: RunOutcome::Exhausted,
                },
                tick(DELAY),
            ],
            &mut commands,
        );

        assert!(commands.is_empty());
        assert_eq!(execution.active_generation(), None);
    }

    #[test]
    fn newer_run_discards_stale_pending_action() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(1, 3),
                tick(DELAY / 2),
                started(2, 3),
                tick(DELAY / 2),
            ],
            &mut commands,
        );
        assert!(commands.is_empty(), "delay restarts with the newer run");

        execution.handle(
            &[stepped(1, 0, StepOutcome::Clear), tick(DELAY / 2)],
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::StepRobot {
                generation: RunGeneration::new(2),
                step: 0,
            }]
        );
    }

    #[test]
    fn stale_finish_does_not_cancel_active_run() {
        let mut execution = Execution::new(DELAY);
        let mut commands = Vec::new();

        execution.handle(
            &[
                started(3, 1),
                Event::RunFinished {
                    generation: RunGeneration::new(2),
                    outcome: RunOutcome::Failed,
                },
            ],
            &mut commands,
        );

        assert_eq!(execution.active_generation(), Some(RunGeneration::new(3)));
        assert_eq!(execution.pending(), Some(PendingAction::Step(0)));
    }
}
