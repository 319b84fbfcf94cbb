//! Error types for building puzzles, solving them, and drawing the result.
//!
//! Only genuinely exceptional conditions live here. A puzzle that simply has no fill is not an
//! error; see `SolveOutcome::NoSolution`.

use std::io;
use std::path::PathBuf;

use crate::puzzle::Variable;

/// Failures while turning a grid structure and word list into a `Puzzle`.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("grid structure has no cells")]
    EmptyStructure,

    #[error("word list has no entries")]
    EmptyWordList,

    #[error("variable {variable} has zero length")]
    ZeroLengthVariable { variable: Variable },

    #[error("variable {variable} does not fit in a {height}x{width} grid")]
    VariableOutOfBounds {
        variable: Variable,
        height: usize,
        width: usize,
    },

    #[error("variables {first} and {second} share more than one cell")]
    MultipleOverlaps { first: Variable, second: Variable },
}

/// Failures that make a solve attempt impossible before search begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    /// No word in the list has the length this variable needs.
    #[error("no word of length {} fits variable {variable}", .variable.length)]
    MalformedInput { variable: Variable },
}

/// Failures while writing a filled grid out as an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("a {height}x{width} grid is too large to draw")]
    TooLarge { height: usize, width: usize },

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },
}
