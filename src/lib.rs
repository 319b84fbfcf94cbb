//! Crossword filling as a constraint satisfaction problem.
//!
//! Each slot in the grid is a variable whose domain starts as the whole word list. Solving runs
//! node consistency (words of the right length), AC-3 arc consistency (crossing slots agree on
//! their shared letter), and then a backtracking search ordered by minimum remaining values with
//! a least-constraining-value ordering of candidate words. No word may be used twice.
//!
//! ```
//! use crossfill::{solve, render_grid, Puzzle, SolveOutcome, WordList};
//!
//! let words = WordList::new(["CAT", "TAP", "DOG"]);
//! let puzzle = Puzzle::from_structure_str("___\n##_\n##_\n", words)?;
//!
//! match solve(&puzzle)? {
//!     SolveOutcome::Solved(solution) => {
//!         assert_eq!(render_grid(&puzzle, &solution.assignment), "CAT\n██A\n██P");
//!     }
//!     other => panic!("unexpected outcome {:?}", other),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arc_consistency;
pub mod domains;
pub mod errors;
pub mod log;
pub mod puzzle;
pub mod render;
pub mod search;
pub mod solver;

pub use crate::domains::Domains;
pub use crate::errors::{PuzzleError, RenderError, SolveError};
pub use crate::puzzle::{Direction, Puzzle, Variable, VariableId, Word, WordId, WordList};
pub use crate::render::{draw_image, letter_grid, render_grid, save_image, Raster};
pub use crate::search::{Assignment, SearchBudget, Statistics};
pub use crate::solver::{solve, Solution, SolveOutcome, Solver, SolverConfig};
