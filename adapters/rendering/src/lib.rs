#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Robot Maze adapters.
//!
//! Adapters never own game logic. Through the [`Presenter`] trait they
//! receive a static [`Scene`] describing the board once, then a stream of run
//! snapshots.

use robot_maze_core::{CellCoord, Goal, GridBounds, Obstacle, Program, RunState};

/// Static description of the board and its hazards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Grid the robot moves on.
    pub bounds: GridBounds,
    /// Goal marker.
    pub goal: Goal,
    /// Hazards placed on the board.
    pub obstacles: Vec<Obstacle>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(bounds: GridBounds, goal: Goal, obstacles: Vec<Obstacle>) -> Self {
        Self {
            bounds,
            goal,
            obstacles,
        }
    }

    /// Hazard drawn on the provided cell, if any.
    #[must_use]
    pub fn obstacle_at(&self, cell: CellCoord) -> Option<&Obstacle> {
        self.obstacles.iter().find(|obstacle| obstacle.cell() == cell)
    }
}

/// Presentation collaborator fed by the game session.
///
/// Implementations must treat every call as a pure rendering request.
pub trait Presenter {
    /// Receives the static board once, before any state is rendered.
    fn show_scene(&mut self, scene: &Scene);

    /// Renders the robot state together with the program being authored.
    ///
    /// Called once per emitted run state and once per program edit.
    fn render_state(&mut self, state: &RunState, program: &Program);

    /// Announces that the robot reached the goal. Called once per successful run.
    fn notify_goal_reached(&mut self);
}

/// Single call observed by a [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresentedFrame {
    /// A state was rendered.
    State {
        /// Rendered robot state.
        state: RunState,
        /// Program shown next to the board.
        program: Program,
    },
    /// The goal notification fired.
    GoalReached,
}

/// Presenter that records every call, used for replays and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingPresenter {
    scene: Option<Scene>,
    frames: Vec<PresentedFrame>,
}

impl RecordingPresenter {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene received from the session, if any.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Frames recorded so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[PresentedFrame] {
        &self.frames
    }

    /// Rendered states in the order they were presented.
    pub fn states(&self) -> impl Iterator<Item = &RunState> {
        self.frames.iter().filter_map(|frame| match frame {
            PresentedFrame::State { state, .. } => Some(state),
            PresentedFrame::GoalReached => None,
        })
    }

    /// Number of goal notifications received.
    #[must_use]
    pub fn goal_notifications(&self) -> usize {
        self.frames
            .iter()
            .filter(|frame| matches!(frame, PresentedFrame::GoalReached))
            .count()
    }

    /// Discards every recorded frame. The scene is kept.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn show_scene(&mut self, scene: &Scene) {
        self.scene = Some(scene.clone());
    }

    fn render_state(&mut self, state: &RunState, program: &Program) {
        self.frames.push(PresentedFrame::State {
            state: *state,
            program: program.clone(),
        });
    }

    fn notify_goal_reached(&mut self) {
        self.frames.push(PresentedFrame::GoalReached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_maze_core::{Instruction, ObstacleKind};

    #[test]
    fn recording_presenter_keeps_call_order() {
        let mut recorder = RecordingPresenter::new();
        let program: Program = vec![Instruction::Right].into();

        recorder.render_state(&RunState::initial(), &program);
        recorder.notify_goal_reached();

        assert_eq!(
            recorder.frames(),
            &[
                PresentedFrame::State {
                    state: RunState::initial(),
                    program,
                },
                PresentedFrame::GoalReached,
            ]
        );
        assert_eq!(recorder.goal_notifications(), 1);
        assert_eq!(recorder.states().count(), 1);

        recorder.clear();
        assert!(recorder.frames().is_empty());
    }

    #[test]
    fn scene_looks_up_obstacles_by_cell() {
        let obstacle = Obstacle::new(ObstacleKind::Hole, CellCoord::new(0, 4));
        let scene = Scene::new(
            GridBounds::new(8),
            Goal::at(CellCoord::new(7, 7)),
            vec![obstacle],
        );

        assert_eq!(scene.obstacle_at(CellCoord::new(0, 4)), Some(&obstacle));
        assert_eq!(scene.obstacle_at(CellCoord::new(4, 0)), None);
    }
}
