//! Level descriptions: grid size, goal cell and the static obstacle map.
//!
//! Levels are authored as TOML:
//!
//! ```toml
//! dimension = 8
//! goal = [7, 7]
//!
//! [[obstacles]]
//! kind = "water"
//! at = [1, 0]
//! ```
//!
//! The goal marker is not an obstacle. It may share a cell with one, in which
//! case reaching it still counts as success.

use robot_maze_core::{
    CellCoord, Goal, GridBounds, Obstacle, ObstacleKind, ObstacleView, DEFAULT_GRID_DIMENSION,
};
use serde::Deserialize;
use thiserror::Error;

use crate::obstacles::ObstacleMap;

const DEFAULT_GOAL: CellCoord = CellCoord::new(7, 7);

const DEFAULT_COURSE: [Obstacle; 19] = [
    Obstacle::new(ObstacleKind::Water, CellCoord::new(1, 0)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(1, 1)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(1, 2)),
    Obstacle::new(ObstacleKind::Fire, CellCoord::new(3, 3)),
    Obstacle::new(ObstacleKind::Hole, CellCoord::new(0, 4)),
    Obstacle::new(ObstacleKind::Hole, CellCoord::new(1, 4)),
    Obstacle::new(ObstacleKind::Hole, CellCoord::new(2, 4)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(4, 5)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(4, 6)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(5, 5)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(6, 5)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(5, 4)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(6, 4)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(5, 3)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(6, 3)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(7, 3)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(6, 2)),
    Obstacle::new(ObstacleKind::Water, CellCoord::new(7, 2)),
    Obstacle::new(ObstacleKind::Fire, CellCoord::new(1, 6)),
];

/// Reasons a level description may be rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The level text is not valid TOML or does not match the level schema.
    #[error("failed to parse level: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// The grid must contain at least one cell.
    #[error("level dimension must be positive")]
    ZeroDimension,
    /// The goal lies outside the grid.
    #[error("goal ({column}, {row}) lies outside the {dimension}x{dimension} grid")]
    GoalOutOfBounds {
        /// Column of the goal.
        column: u32,
        /// Row of the goal.
        row: u32,
        /// Grid dimension.
        dimension: u32,
    },
    /// An obstacle lies outside the grid.
    #[error("obstacle ({column}, {row}) lies outside the {dimension}x{dimension} grid")]
    ObstacleOutOfBounds {
        /// Column of the obstacle.
        column: u32,
        /// Row of the obstacle.
        row: u32,
        /// Grid dimension.
        dimension: u32,
    },
    /// Two obstacles were placed on the same cell.
    #[error("more than one obstacle placed at ({column}, {row})")]
    DuplicateObstacle {
        /// Column of the contested cell.
        column: u32,
        /// Row of the contested cell.
        row: u32,
    },
}

/// Validated level ready to seed a world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    bounds: GridBounds,
    goal: Goal,
    obstacles: ObstacleMap,
}

impl Level {
    /// Builds a level, validating the goal and every obstacle against the grid.
    pub fn new(
        dimension: u32,
        goal: CellCoord,
        obstacles: impl IntoIterator<Item = Obstacle>,
    ) -> Result<Self, LevelError> {
        if dimension == 0 {
            return Err(LevelError::ZeroDimension);
        }

        let bounds = GridBounds::new(dimension);
        if !bounds.contains(goal) {
            return Err(LevelError::GoalOutOfBounds {
                column: goal.column(),
                row: goal.row(),
                dimension,
            });
        }

        let mut map = ObstacleMap::new();
        for obstacle in obstacles {
            map.register(obstacle, bounds)?;
        }

        Ok(Self {
            bounds,
            goal: Goal::at(goal),
            obstacles: map,
        })
    }

    /// Parses and validates a level authored as TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, LevelError> {
        let file: LevelFile = toml::from_str(contents).map_err(|error| LevelError::Parse {
            message: error.to_string(),
        })?;

        let obstacles = file
            .obstacles
            .into_iter()
            .map(|entry| Obstacle::new(entry.kind, CellCoord::new(entry.at[0], entry.at[1])));
        Self::new(
            file.dimension,
            CellCoord::new(file.goal[0], file.goal[1]),
            obstacles,
        )
    }

    /// Bounds of the level's grid.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Goal the robot must reach.
    #[must_use]
    pub const fn goal(&self) -> Goal {
        self.goal
    }

    /// Read-only view of the level's hazards.
    #[must_use]
    pub fn obstacles(&self) -> ObstacleView<'_> {
        self.obstacles.view()
    }

    pub(crate) fn into_parts(self) -> (GridBounds, Goal, ObstacleMap) {
        (self.bounds, self.goal, self.obstacles)
    }
}

impl Default for Level {
    /// The built-in course: an 8x8 grid with the goal in the far corner.
    fn default() -> Self {
        Self {
            bounds: GridBounds::new(DEFAULT_GRID_DIMENSION),
            goal: Goal::at(DEFAULT_GOAL),
            obstacles: ObstacleMap::from_entries(DEFAULT_COURSE.to_vec()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    #[serde(default = "default_dimension")]
    dimension: u32,
    goal: [u32; 2],
    #[serde(default)]
    obstacles: Vec<ObstacleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObstacleEntry {
    kind: ObstacleKind,
    at: [u32; 2],
}

fn default_dimension() -> u32 {
    DEFAULT_GRID_DIMENSION
}
