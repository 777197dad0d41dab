#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robot Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.
//!
//! Commands that belong to a run carry a [`RunGeneration`]. Starting a new run
//! allocates a fresh generation, so any command produced for an earlier run is
//! recognisably stale.

use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Robot Maze.";

/// Number of cells along each edge of the default square grid.
pub const DEFAULT_GRID_DIMENSION: u32 = 8;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Appends an instruction to the end of the player's program.
    AppendInstruction {
        /// Instruction to append.
        instruction: Instruction,
    },
    /// Removes the program step at the provided ordinal position.
    RemoveInstruction {
        /// Zero-based position of the step to remove.
        index: usize,
    },
    /// Starts a new run of the current program from the origin.
    StartRun,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the robot execute the next instruction of the active run.
    StepRobot {
        /// Run the step belongs to.
        generation: RunGeneration,
        /// Zero-based index of the instruction to execute.
        step: usize,
    },
    /// Requests that the robot standing on a hazard be destroyed.
    DestroyRobot {
        /// Run the destruction belongs to.
        generation: RunGeneration,
    },
    /// Requests that an exhausted run return to idle.
    FinishRun {
        /// Run that ran out of instructions.
        generation: RunGeneration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the player's program changed.
    ProgramEdited {
        /// Program after the edit was applied.
        program: Program,
    },
    /// Announces that a run began from the origin.
    RunStarted {
        /// Generation allocated to the run.
        generation: RunGeneration,
        /// Program snapshot the run executes.
        program: Program,
    },
    /// Publishes a run state snapshot that presentation layers should render.
    StateEmitted {
        /// Run the snapshot belongs to.
        generation: RunGeneration,
        /// Robot state after the most recent transition.
        state: RunState,
        /// Phase of the run after the most recent transition.
        phase: RunPhase,
    },
    /// Confirms that the robot executed one instruction.
    RobotStepped {
        /// Run the step belongs to.
        generation: RunGeneration,
        /// Zero-based index of the executed instruction.
        step: usize,
        /// Cell occupied before the instruction.
        from: CellCoord,
        /// Cell occupied after the instruction. Equals `from` when the move was absorbed by the grid edge.
        to: CellCoord,
        /// Classification of the cell the robot ended on.
        outcome: StepOutcome,
    },
    /// Announces that the robot reached the goal cell.
    GoalReached {
        /// Run that reached the goal.
        generation: RunGeneration,
    },
    /// Announces that the robot was destroyed by an obstacle.
    RobotDestroyed {
        /// Run that failed.
        generation: RunGeneration,
        /// Obstacle that destroyed the robot.
        obstacle: Obstacle,
    },
    /// Announces that a run reached a terminal classification.
    RunFinished {
        /// Run that finished.
        generation: RunGeneration,
        /// Final classification of the run.
        outcome: RunOutcome,
    },
    /// Reports that a run command did not match the active run and was ignored.
    RunCommandRejected {
        /// Generation carried by the rejected command.
        generation: RunGeneration,
        /// Specific reason the command was ignored.
        reason: RunRejection,
    },
}

/// Single directional move the robot can be programmed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instruction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Instruction {
    /// Every instruction in button order.
    pub const ALL: [Instruction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Column and row offsets applied by the instruction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Arrow glyph used when listing the instruction in a program strip.
    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Right => '→',
            Self::Down => '↓',
            Self::Left => '←',
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Cell the robot starts every run from.
    pub const ORIGIN: CellCoord = CellCoord::new(0, 0);

    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Square cell space the robot moves within.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    dimension: u32,
}

impl GridBounds {
    /// Creates bounds for a grid with `dimension` cells along each edge.
    #[must_use]
    pub const fn new(dimension: u32) -> Self {
        Self { dimension }
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.dimension && cell.row() < self.dimension
    }

    /// Shifts the cell one step in the instruction's direction.
    ///
    /// Moves that would leave the grid are absorbed: the original cell is
    /// returned unchanged.
    #[must_use]
    pub fn clamped_move(&self, cell: CellCoord, instruction: Instruction) -> CellCoord {
        let (column_offset, row_offset) = instruction.offset();
        let candidate = cell
            .column()
            .checked_add_signed(column_offset)
            .zip(cell.row().checked_add_signed(row_offset))
            .map(|(column, row)| CellCoord::new(column, row));

        match candidate {
            Some(next) if self.contains(next) => next,
            _ => cell,
        }
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let dimension = self.dimension;
        (0..dimension)
            .flat_map(move |row| (0..dimension).map(move |column| CellCoord::new(column, row)))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_DIMENSION)
    }
}

/// Ordered, immutable sequence of instructions authored by the player.
///
/// Every edit returns a new program; clones share storage, so a snapshot taken
/// before an edit stays valid afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Instruction>", into = "Vec<Instruction>")]
pub struct Program {
    instructions: Arc<[Instruction]>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new program with `instruction` added at the end.
    #[must_use]
    pub fn append(&self, instruction: Instruction) -> Self {
        let mut instructions = Vec::with_capacity(self.len() + 1);
        instructions.extend_from_slice(&self.instructions);
        instructions.push(instruction);
        Self::from(instructions)
    }

    /// Returns a new program without the step at `index`.
    ///
    /// An index outside the program leaves it unchanged.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        if index >= self.len() {
            return self.clone();
        }

        let instructions: Vec<Instruction> = self
            .instructions
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != index)
            .map(|(_, instruction)| *instruction)
            .collect();
        Self::from(instructions)
    }

    /// Number of steps in the program.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Reports whether the program has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.instructions.get(index).copied()
    }

    /// Iterator over the program steps in execution order.
    pub fn iter(&self) -> impl Iterator<Item = Instruction> + '_ {
        self.instructions.iter().copied()
    }

    /// Program steps as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }
}

impl From<Program> for Vec<Instruction> {
    fn from(program: Program) -> Self {
        program.instructions.to_vec()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Kinds of hazards that can occupy a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Open water the robot sinks in.
    Water,
    /// Fire the robot burns in.
    Fire,
    /// Hole the robot falls into.
    Hole,
}

impl ObstacleKind {
    /// Lowercase name used in level files and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Fire => "fire",
            Self::Hole => "hole",
        }
    }
}

/// Hazard placed on a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    kind: ObstacleKind,
    cell: CellCoord,
}

impl Obstacle {
    /// Creates an obstacle of the provided kind at `cell`.
    #[must_use]
    pub const fn new(kind: ObstacleKind, cell: CellCoord) -> Self {
        Self { kind, cell }
    }

    /// Kind of hazard.
    #[must_use]
    pub const fn kind(&self) -> ObstacleKind {
        self.kind
    }

    /// Cell the hazard occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

/// Read-only view over the static obstacle map.
#[derive(Clone, Copy, Debug)]
pub struct ObstacleView<'a> {
    obstacles: &'a [Obstacle],
}

impl<'a> ObstacleView<'a> {
    /// Captures a new obstacle view backed by the provided slice.
    #[must_use]
    pub const fn new(obstacles: &'a [Obstacle]) -> Self {
        Self { obstacles }
    }

    /// Returns the obstacle occupying the provided cell, if any.
    #[must_use]
    pub fn obstacle_at(&self, cell: CellCoord) -> Option<Obstacle> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.cell() == cell)
            .copied()
    }

    /// Iterator over the registered obstacles in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Obstacle> + 'a {
        self.obstacles.iter()
    }

    /// Number of registered obstacles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Reports whether no obstacles are registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

/// Canonical representation of the cell the robot must reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Goal {
    cell: CellCoord,
}

impl Goal {
    /// Creates a goal anchored at the provided cell coordinate.
    #[must_use]
    pub const fn at(cell: CellCoord) -> Self {
        Self { cell }
    }

    /// Returns the cell that defines the goal.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }
}

/// Whether the robot survived its most recent step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RobotStatus {
    /// Robot is intact.
    #[default]
    Alive,
    /// Robot was destroyed by an obstacle.
    Dead,
}

/// Snapshot of the robot during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunState {
    /// Cell currently occupied by the robot.
    pub robot: CellCoord,
    /// Whether the robot is still intact.
    pub status: RobotStatus,
}

impl RunState {
    /// State every run starts from: robot at the origin, alive.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            robot: CellCoord::ORIGIN,
            status: RobotStatus::Alive,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Lifecycle phase of the execution engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run is in progress.
    #[default]
    Idle,
    /// A run is in progress.
    Running {
        /// Number of instructions already executed in the run.
        step: usize,
    },
    /// The robot reached the goal.
    Succeeded,
    /// The robot was destroyed by an obstacle.
    Failed,
}

impl RunPhase {
    /// Reports whether a run is currently in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Classification of the cell the robot landed on after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Nothing happened; the run continues.
    Clear,
    /// The robot landed on the goal.
    GoalReached,
    /// The robot landed on a hazard and will be destroyed.
    HazardHit {
        /// Kind of hazard occupying the cell.
        kind: ObstacleKind,
    },
}

/// Terminal classification of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The robot reached the goal.
    Succeeded,
    /// The robot was destroyed by an obstacle.
    Failed,
    /// The program ran out of instructions without reaching the goal or a hazard.
    Exhausted,
}

/// Reasons a run command may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunRejection {
    /// The command belongs to a run that has been superseded.
    StaleGeneration,
    /// No run is in progress.
    NotRunning,
    /// The step index does not match the next instruction of the run.
    StepOutOfOrder,
    /// The robot is waiting to be destroyed and cannot take further steps.
    HazardPending,
    /// A destruction was requested while the robot is not on a hazard.
    NoHazard,
    /// A finish was requested before every instruction executed.
    InstructionsRemaining,
}

/// Token identifying a single run.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RunGeneration(u64);

impl RunGeneration {
    /// Creates a generation token with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the token.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Token allocated to the run that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
