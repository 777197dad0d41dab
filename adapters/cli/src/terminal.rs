use std::io::{self, Write};

use robot_maze_core::{CellCoord, ObstacleKind, Program, RobotStatus, RunState};
use robot_maze_rendering::{Presenter, Scene};

/// Banner printed when the robot reaches the goal.
pub(crate) const GOAL_BANNER: &str = "The robot reached the goal!";

/// Presenter that draws the board as rows of glyphs.
///
/// Write failures are latched until [`TerminalPresenter::finish`].
#[derive(Debug)]
pub(crate) struct TerminalPresenter<W> {
    scene: Option<Scene>,
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            scene: None,
            out,
            error: None,
        }
    }

    /// Flushes the output and returns the first write failure, if any.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.out.flush()
    }

    fn write_frame(&mut self, frame: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.out.write_all(frame.as_bytes()) {
            self.error = Some(error);
        }
    }
}

fn glyph(scene: &Scene, state: &RunState, cell: CellCoord) -> char {
    if cell == state.robot {
        return match state.status {
            RobotStatus::Alive => 'R',
            RobotStatus::Dead => 'X',
        };
    }
    if cell == scene.goal.cell() {
        return 'G';
    }
    scene
        .obstacle_at(cell)
        .map_or('.', |obstacle| obstacle_glyph(obstacle.kind()))
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_scene(&mut self, scene: &Scene) {
        self.scene = Some(scene.clone());
    }

    fn render_state(&mut self, state: &RunState, program: &Program) {
        let mut frame = String::new();

        frame.push_str("program:");
        for instruction in program.iter() {
            frame.push(' ');
            frame.push(instruction.arrow());
        }
        frame.push('\n');

        if let Some(scene) = &self.scene {
            let dimension = scene.bounds.dimension();
            for row in 0..dimension {
                let line: Vec<String> = (0..dimension)
                    .map(|column| glyph(scene, state, CellCoord::new(column, row)).to_string())
                    .collect();
                frame.push_str(&line.join(" "));
                frame.push('\n');
            }
        }
        frame.push('\n');

        self.write_frame(&frame);
    }

    fn notify_goal_reached(&mut self) {
        self.write_frame(&format!("{GOAL_BANNER}\n"));
    }
}

/// Character drawn for an obstacle of the provided kind.
pub(crate) const fn obstacle_glyph(kind: ObstacleKind) -> char {
    match kind {
        ObstacleKind::Water => '~',
        ObstacleKind::Fire => '^',
        ObstacleKind::Hole => 'O',
    }
}
