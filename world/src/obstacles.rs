//! Static obstacle map registered once when a level is built.

use robot_maze_core::{CellCoord, GridBounds, Obstacle, ObstacleView};

use crate::level::LevelError;

/// Registry that stores the hazards of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ObstacleMap {
    entries: Vec<Obstacle>,
}

impl ObstacleMap {
    /// Creates an empty obstacle map.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Creates a map from obstacles already known to be distinct and on the grid.
    pub(crate) fn from_entries(entries: Vec<Obstacle>) -> Self {
        Self { entries }
    }

    /// Registers an obstacle, rejecting cells outside `bounds` and cells already taken.
    pub(crate) fn register(
        &mut self,
        obstacle: Obstacle,
        bounds: GridBounds,
    ) -> Result<(), LevelError> {
        let cell = obstacle.cell();
        if !bounds.contains(cell) {
            return Err(LevelError::ObstacleOutOfBounds {
                column: cell.column(),
                row: cell.row(),
                dimension: bounds.dimension(),
            });
        }

        if self.obstacle_at(cell).is_some() {
            return Err(LevelError::DuplicateObstacle {
                column: cell.column(),
                row: cell.row(),
            });
        }

        self.entries.push(obstacle);
        Ok(())
    }

    pub(crate) fn obstacle_at(&self, cell: CellCoord) -> Option<Obstacle> {
        self.view().obstacle_at(cell)
    }

    pub(crate) fn view(&self) -> ObstacleView<'_> {
        ObstacleView::new(&self.entries)
    }
}
