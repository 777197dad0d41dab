#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single top-level handle that drives a Robot Maze game.
//!
//! A [`Session`] owns the world, the execution system and the presenter.
//! Player input and elapsed time enter as commands; the session pumps the
//! resulting events through the execution system until the world settles and
//! forwards every observable transition to the presenter.

use std::time::Duration;

use robot_maze_core::{Command, Event, Instruction, Program, RunOutcome, RunPhase, RunState};
use robot_maze_rendering::{Presenter, Scene};
use robot_maze_system_execution::{Execution, DEFAULT_STEP_DELAY};
use robot_maze_world::{self as world, level::Level, query, World};
use tracing::{debug, info};

/// Tunables applied when a session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Simulated time between successive run transitions.
    pub step_delay: Duration,
}

impl SessionConfig {
    /// Creates a configuration with the provided step delay.
    #[must_use]
    pub const fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

/// Game session binding the world, run pacing and presentation together.
#[derive(Debug)]
pub struct Session<P> {
    world: World,
    execution: Execution,
    presenter: P,
    last_outcome: Option<RunOutcome>,
}

impl<P: Presenter> Session<P> {
    /// Creates a session for the provided level and hands its scene to the presenter.
    #[must_use]
    pub fn new(level: Level, config: SessionConfig, presenter: P) -> Self {
        let mut session = Self {
            world: World::from_level(level),
            execution: Execution::new(config.step_delay),
            presenter,
            last_outcome: None,
        };
        let scene = session.scene();
        session.presenter.show_scene(&scene);
        session
    }

    /// Appends an instruction to the end of the program.
    pub fn add_instruction(&mut self, instruction: Instruction) {
        self.submit(Command::AppendInstruction { instruction });
    }

    /// Removes the program step at `index`. Indices past the end are ignored.
    pub fn remove_instruction_at(&mut self, index: usize) {
        self.submit(Command::RemoveInstruction { index });
    }

    /// Starts a new run of the current program, superseding any run in flight.
    pub fn start_run(&mut self) {
        self.submit(Command::StartRun);
    }

    /// Advances simulated time, releasing any run transition that became due.
    pub fn tick(&mut self, dt: Duration) {
        self.submit(Command::Tick { dt });
    }

    /// Program the player is authoring.
    #[must_use]
    pub fn program(&self) -> &Program {
        query::program(&self.world)
    }

    /// Robot state of the most recent run.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        query::run_state(&self.world)
    }

    /// Lifecycle phase of the most recent run.
    #[must_use]
    pub fn run_phase(&self) -> RunPhase {
        query::run_phase(&self.world)
    }

    /// Reports whether a run is still executing instructions or awaiting destruction.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_phase().is_running()
    }

    /// Outcome of the most recently finished run, if any run finished yet.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
    }

    /// Greeting shown when the game boots.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Static scene describing the board, the goal and the hazards.
    #[must_use]
    pub fn scene(&self) -> Scene {
        Scene::new(
            query::grid_bounds(&self.world),
            query::goal(&self.world),
            query::obstacles(&self.world).iter().copied().collect(),
        )
    }

    /// Presenter receiving the session's frames.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presenter.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    fn submit(&mut self, command: Command) {
        let mut queue = vec![command];
        let mut events = Vec::new();
        while !queue.is_empty() {
            for command in queue.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.dispatch(&events);
            self.execution.handle(&events, &mut queue);
            events.clear();
        }
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::ProgramEdited { program } => {
                    debug!(len = program.len(), "program_edited");
                    let state = query::run_state(&self.world);
                    self.presenter.render_state(&state, program);
                }
                Event::RunStarted {
                    generation,
                    program,
                } => {
                    info!(
                        generation = generation.get(),
                        instructions = program.len(),
                        "run_started"
                    );
                }
                Event::StateEmitted { state, .. } => {
                    self.presenter
                        .render_state(state, query::program(&self.world));
                }
                Event::RobotStepped {
                    generation,
                    step,
                    from,
                    to,
                    outcome,
                } => {
                    debug!(
                        generation = generation.get(),
                        step,
                        from = ?from,
                        to = ?to,
                        outcome = ?outcome,
                        "robot_stepped"
                    );
                }
                Event::GoalReached { .. } => self.presenter.notify_goal_reached(),
                Event::RobotDestroyed {
                    generation,
                    obstacle,
                } => {
                    info!(
                        generation = generation.get(),
                        obstacle = obstacle.kind().name(),
                        column = obstacle.cell().column(),
                        row = obstacle.cell().row(),
                        "robot_destroyed"
                    );
                }
                Event::RunFinished {
                    generation,
                    outcome,
                } => {
                    if *generation == query::run_generation(&self.world) {
                        self.last_outcome = Some(*outcome);
                    }
                    info!(generation = generation.get(), outcome = ?outcome, "run_finished");
                }
                Event::RunCommandRejected { generation, reason } => {
                    debug!(generation = generation.get(), reason = ?reason, "run_command_rejected");
                }
                Event::TimeAdvanced { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_maze_rendering::RecordingPresenter;

    fn session() -> Session<RecordingPresenter> {
        Session::new(
            Level::default(),
            SessionConfig::new(Duration::from_millis(10)),
            RecordingPresenter::new(),
        )
    }

    #[test]
    fn default_config_uses_one_second_delay() {
        assert_eq!(SessionConfig::default().step_delay, Duration::from_secs(1));
    }

    #[test]
    fn edits_render_current_state_with_new_program() {
        let mut session = session();

        session.add_instruction(Instruction::Down);
        session.add_instruction(Instruction::Right);
        session.remove_instruction_at(0);

        let programs: Vec<Vec<Instruction>> = session
            .presenter()
            .frames()
            .iter()
            .filter_map(|frame| match frame {
                robot_maze_rendering::PresentedFrame::State { program, .. } => {
                    Some(program.as_slice().to_vec())
                }
                robot_maze_rendering::PresentedFrame::GoalReached => None,
            })
            .collect();
        assert_eq!(
            programs,
            vec![
                vec![Instruction::Down],
                vec![Instruction::Down, Instruction::Right],
                vec![Instruction::Right],
            ]
        );
    }

    #[test]
    fn removing_past_the_end_renders_nothing() {
        let mut session = session();
        session.add_instruction(Instruction::Down);
        session.presenter_mut().clear();

        session.remove_instruction_at(4);

        assert!(session.presenter().frames().is_empty());
        assert_eq!(session.program().len(), 1);
    }

    #[test]
    fn presenter_receives_scene_before_any_frame() {
        let session = session();

        let scene = session.presenter().scene().expect("scene shown at creation");

        assert_eq!(scene, &session.scene());
        assert_eq!(scene.bounds.dimension(), 8);
        assert_eq!(scene.obstacles.len(), 19);
        assert_eq!(scene.goal, query::goal(&World::new()));
        assert!(session.presenter().frames().is_empty());
        assert_eq!(session.welcome_banner(), "Welcome to Robot Maze.");
    }
}
