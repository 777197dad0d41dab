#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Robot Maze.
//!
//! The world owns the player's program, the static level and the state of the
//! active run. Every mutation flows through [`apply`]; run commands are only
//! honoured when they carry the generation of the active run and address the
//! next expected transition, so continuations scheduled for a superseded run
//! can never touch the current one.

pub mod level;
mod obstacles;

use robot_maze_core::{
    Command, Event, Goal, GridBounds, Obstacle, Program, RobotStatus, RunGeneration, RunOutcome,
    RunPhase, RunRejection, RunState, StepOutcome, WELCOME_BANNER,
};

use crate::{level::Level, obstacles::ObstacleMap};

/// Represents the authoritative Robot Maze world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    bounds: GridBounds,
    goal: Goal,
    obstacles: ObstacleMap,
    program: Program,
    run: Run,
}

impl World {
    /// Creates a new world seeded with the built-in course.
    #[must_use]
    pub fn new() -> Self {
        Self::from_level(Level::default())
    }

    /// Creates a new world seeded with the provided level.
    #[must_use]
    pub fn from_level(level: Level) -> Self {
        let (bounds, goal, obstacles) = level.into_parts();
        Self {
            banner: WELCOME_BANNER,
            bounds,
            goal,
            obstacles,
            program: Program::new(),
            run: Run::idle(RunGeneration::default()),
        }
    }

    fn start_run(&mut self, out_events: &mut Vec<Event>) {
        let generation = self.run.generation.next();
        let program = self.program.clone();
        self.run = Run::start(generation, program.clone());

        out_events.push(Event::RunStarted {
            generation,
            program,
        });
        out_events.push(self.run.snapshot());

        if self.run.program.is_empty() {
            out_events.push(Event::RunFinished {
                generation,
                outcome: RunOutcome::Exhausted,
            });
        }
    }

    fn step_robot(&mut self, generation: RunGeneration, step: usize, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.run.accepts_step(generation, step) {
            out_events.push(Event::RunCommandRejected { generation, reason });
            return;
        }
        let Some(instruction) = self.run.program.get(step) else {
            out_events.push(Event::RunCommandRejected {
                generation,
                reason: RunRejection::StepOutOfOrder,
            });
            return;
        };

        let from = self.run.state.robot;
        let to = self.bounds.clamped_move(from, instruction);
        self.run.state.robot = to;

        // Goal wins over a hazard sharing its cell.
        let outcome = if to == self.goal.cell() {
            self.run.phase = RunPhase::Succeeded;
            StepOutcome::GoalReached
        } else if let Some(obstacle) = self.obstacles.obstacle_at(to) {
            self.run.hazard = Some(obstacle);
            self.run.phase = RunPhase::Running { step: step + 1 };
            StepOutcome::HazardHit {
                kind: obstacle.kind(),
            }
        } else {
            self.run.phase = RunPhase::Running { step: step + 1 };
            StepOutcome::Clear
        };

        out_events.push(Event::RobotStepped {
            generation,
            step,
            from,
            to,
            outcome,
        });
        out_events.push(self.run.snapshot());

        if outcome == StepOutcome::GoalReached {
            out_events.push(Event::GoalReached { generation });
            out_events.push(Event::RunFinished {
                generation,
                outcome: RunOutcome::Succeeded,
            });
        }
    }

    fn destroy_robot(&mut self, generation: RunGeneration, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.run.accepts(generation) {
            out_events.push(Event::RunCommandRejected { generation, reason });
            return;
        }
        let Some(obstacle) = self.run.hazard.take() else {
            out_events.push(Event::RunCommandRejected {
                generation,
                reason: RunRejection::NoHazard,
            });
            return;
        };

        self.run.state.status = RobotStatus::Dead;
        self.run.phase = RunPhase::Failed;
        out_events.push(self.run.snapshot());
        out_events.push(Event::RobotDestroyed {
            generation,
            obstacle,
        });
        out_events.push(Event::RunFinished {
            generation,
            outcome: RunOutcome::Failed,
        });
    }

    fn finish_run(&mut self, generation: RunGeneration, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.run.accepts(generation) {
            out_events.push(Event::RunCommandRejected { generation, reason });
            return;
        }
        if self.run.hazard.is_some() {
            out_events.push(Event::RunCommandRejected {
                generation,
                reason: RunRejection::HazardPending,
            });
            return;
        }
        if self.run.executed() < self.run.program.len() {
            out_events.push(Event::RunCommandRejected {
                generation,
                reason: RunRejection::InstructionsRemaining,
            });
            return;
        }

        self.run.phase = RunPhase::Idle;
        out_events.push(Event::RunFinished {
            generation,
            outcome: RunOutcome::Exhausted,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AppendInstruction { instruction } => {
            world.program = world.program.append(instruction);
            out_events.push(Event::ProgramEdited {
                program: world.program.clone(),
            });
        }
        Command::RemoveInstruction { index } => {
            if index < world.program.len() {
                world.program = world.program.remove_at(index);
                out_events.push(Event::ProgramEdited {
                    program: world.program.clone(),
                });
            }
        }
        Command::StartRun => world.start_run(out_events),
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
        Command::StepRobot { generation, step } => world.step_robot(generation, step, out_events),
        Command::DestroyRobot { generation } => world.destroy_robot(generation, out_events),
        Command::FinishRun { generation } => world.finish_run(generation, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use robot_maze_core::{Goal, GridBounds, ObstacleView, Program, RunGeneration, RunPhase, RunState};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Bounds of the grid the robot moves within.
    #[must_use]
    pub fn grid_bounds(world: &World) -> GridBounds {
        world.bounds
    }

    /// Goal the robot must reach.
    #[must_use]
    pub fn goal(world: &World) -> Goal {
        world.goal
    }

    /// Read-only view of the static obstacle map.
    #[must_use]
    pub fn obstacles(world: &World) -> ObstacleView<'_> {
        world.obstacles.view()
    }

    /// The player's current program, including edits made during a run.
    #[must_use]
    pub fn program(world: &World) -> &Program {
        &world.program
    }

    /// Robot state of the most recent run.
    #[must_use]
    pub fn run_state(world: &World) -> RunState {
        world.run.state
    }

    /// Phase of the most recent run.
    #[must_use]
    pub fn run_phase(world: &World) -> RunPhase {
        world.run.phase
    }

    /// Generation of the most recent run.
    #[must_use]
    pub fn run_generation(world: &World) -> RunGeneration {
        world.run.generation
    }
}

#[derive(Clone, Debug)]
struct Run {
    generation: RunGeneration,
    program: Program,
    state: RunState,
    phase: RunPhase,
    hazard: Option<Obstacle>,
}

impl Run {
    fn idle(generation: RunGeneration) -> Self {
        Self {
            generation,
            program: Program::new(),
            state: RunState::initial(),
            phase: RunPhase::Idle,
            hazard: None,
        }
    }

    fn start(generation: RunGeneration, program: Program) -> Self {
        let phase = if program.is_empty() {
            RunPhase::Idle
        } else {
            RunPhase::Running { step: 0 }
        };

        Self {
            program,
            phase,
            ..Self::idle(generation)
        }
    }

    fn executed(&self) -> usize {
        match self.phase {
            RunPhase::Running { step } => step,
            _ => 0,
        }
    }

    fn accepts(&self, generation: RunGeneration) -> Result<(), RunRejection> {
        if generation != self.generation {
            return Err(RunRejection::StaleGeneration);
        }
        if !self.phase.is_running() {
            return Err(RunRejection::NotRunning);
        }
        Ok(())
    }

    fn accepts_step(&self, generation: RunGeneration, step: usize) -> Result<(), RunRejection> {
        self.accepts(generation)?;
        if self.hazard.is_some() {
            return Err(RunRejection::HazardPending);
        }
        if step != self.executed() {
            return Err(RunRejection::StepOutOfOrder);
        }
        Ok(())
    }

    fn snapshot(&self) -> Event {
        Event::StateEmitted {
            generation: self.generation,
            state: self.state,
            phase: self.phase,
        }
    }
}
