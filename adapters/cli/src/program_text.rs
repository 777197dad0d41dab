use robot_maze_core::{Instruction, Program};
use thiserror::Error;

/// Errors that can occur while reading a program typed on the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ProgramTextError {
    /// The text contained a character that is not an instruction glyph.
    #[error("unknown instruction '{glyph}' at position {position}; expected U, R, D, L or an arrow")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Character offset of the glyph within the input.
        position: usize,
    },
}

/// Parses a program from instruction glyphs.
///
/// Accepts `U`, `R`, `D`, `L` in either case and the arrows `↑ → ↓ ←`.
/// Whitespace and commas separate nothing and are skipped.
pub(crate) fn decode(text: &str) -> Result<Program, ProgramTextError> {
    text.chars()
        .enumerate()
        .filter(|(_, glyph)| !glyph.is_whitespace() && *glyph != ',')
        .map(|(position, glyph)| {
            instruction_for(glyph).ok_or(ProgramTextError::UnknownGlyph { glyph, position })
        })
        .collect()
}

/// Formats a program as a compact letter string accepted by [`decode`].
pub(crate) fn encode(program: &Program) -> String {
    program.iter().map(letter_for).collect()
}

fn instruction_for(glyph: char) -> Option<Instruction> {
    let instruction = match glyph.to_ascii_uppercase() {
        'U' => Instruction::Up,
        'R' => Instruction::Right,
        'D' => Instruction::Down,
        'L' => Instruction::Left,
        other => Instruction::ALL
            .into_iter()
            .find(|instruction| instruction.arrow() == other)?,
    };
    Some(instruction)
}

const fn letter_for(instruction: Instruction) -> char {
    match instruction {
        Instruction::Up => 'U',
        Instruction::Right => 'R',
        Instruction::Down => 'D',
        Instruction::Left => 'L',
    }
}
