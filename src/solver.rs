use instant::Instant;
use log::{debug, info};

use crate::arc_consistency::{self, Arc, ArcConsistencyFailure};
use crate::domains::Domains;
use crate::errors::SolveError;
use crate::puzzle::Puzzle;
use crate::search::{Assignment, Search, SearchBudget, SearchOutcome, Statistics};

/// Settings for a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub budget: SearchBudget,
}

/// A complete, consistent assignment plus how much work it took to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub assignment: Assignment,
    pub statistics: Statistics,
}

/// The result of a solve that got past input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),

    /// Arc consistency emptied a domain or the search ran out of options.
    NoSolution,

    /// The search budget ran out before the search finished, so it's unknown whether a fill
    /// exists.
    Aborted { statistics: Statistics },
}

impl SolveOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution.assignment),
            _ => None,
        }
    }
}

/// Runs node consistency, then arc consistency, then backtracking search over one puzzle. The
/// puzzle is only borrowed; all state that changes while solving lives in the solver.
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    domains: Domains,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    pub fn new(puzzle: &'a Puzzle) -> Solver<'a> {
        Solver::with_config(puzzle, SolverConfig::default())
    }

    pub fn with_config(puzzle: &'a Puzzle, config: SolverConfig) -> Solver<'a> {
        Solver {
            puzzle,
            domains: Domains::new(puzzle),
            config,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        self.puzzle
    }

    /// The current domains, pruned by whichever steps have run so far.
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn enforce_node_consistency(&mut self) -> Result<(), SolveError> {
        self.domains.enforce_node_consistency(self.puzzle).map(|_| ())
    }

    /// Run AC-3 over `arcs`, or every arc if `None`. Returns false if some domain was emptied.
    pub fn ac3(&mut self, arcs: Option<&[Arc]>) -> bool {
        arc_consistency::ac3(self.puzzle, &mut self.domains, arcs).is_ok()
    }

    /// Search the current domains from an empty assignment.
    pub fn backtrack(&self) -> (SearchOutcome, Statistics) {
        Search::new(self.puzzle, &self.domains, self.config.budget).run()
    }

    pub fn solve(&mut self) -> Result<SolveOutcome, SolveError> {
        let start = Instant::now();
        info!(
            "Solving {} variables with {} words",
            self.puzzle.variables().len(),
            self.puzzle.word_list().len(),
        );

        self.enforce_node_consistency()?;

        if let Err(ArcConsistencyFailure { variable_id }) =
            arc_consistency::ac3(self.puzzle, &mut self.domains, None)
        {
            info!("No solution: no words left for {}", self.puzzle.variable(variable_id));
            return Ok(SolveOutcome::NoSolution);
        }
        debug!("{} candidates remain after propagation", self.domains.total_len());

        let (outcome, statistics) = self.backtrack();
        info!("Search finished in {:?}: {:?}", start.elapsed(), statistics);

        Ok(match outcome {
            SearchOutcome::Found(assignment) => SolveOutcome::Solved(Solution { assignment, statistics }),
            SearchOutcome::Exhausted => SolveOutcome::NoSolution,
            SearchOutcome::Aborted => SolveOutcome::Aborted { statistics },
        })
    }
}

/// Solve a puzzle with the default configuration.
pub fn solve(puzzle: &Puzzle) -> Result<SolveOutcome, SolveError> {
    Solver::new(puzzle).solve()
}

#[cfg(test)]
mod tests {
    use super::{solve, SolveOutcome, Solver, SolverConfig};
    use crate::errors::SolveError;
    use crate::puzzle::{Direction::{Across, Down}, Puzzle, Variable, WordList};
    use crate::search::SearchBudget;

    fn puzzle(variables: Vec<Variable>, words: &[&str]) -> Puzzle {
        Puzzle::from_variables(4, 4, variables, WordList::new(words.iter().copied())).unwrap()
    }

    #[test]
    fn test_solver_stages_can_be_run_individually() {
        let puzzle = puzzle(vec![
            Variable::new(0, 0, Across, 3),
            Variable::new(0, 2, Down, 3),
        ], &["CAT", "TAP", "DOG", "AB"]);
        let mut solver = Solver::new(&puzzle);

        solver.enforce_node_consistency().unwrap();
        assert_eq!(solver.domains().len(0), 3);

        assert!(solver.ac3(None));
        assert_eq!(solver.domains().len(0), 1);
        assert_eq!(solver.domains().len(1), 1);

        let (outcome, _) = solver.backtrack();
        let assignment = match outcome {
            crate::search::SearchOutcome::Found(assignment) => assignment,
            other => panic!("expected a fill, got {:?}", other),
        };
        assert_eq!(assignment.word(&puzzle, 0), Some("CAT"));
        assert_eq!(assignment.word(&puzzle, 1), Some("TAP"));
    }

    #[test]
    fn test_solve_reports_ac3_failure_as_no_solution() {
        let puzzle = puzzle(vec![
            Variable::new(0, 0, Across, 3),
            Variable::new(0, 2, Down, 3),
        ], &["CAT", "DOG"]);

        assert_eq!(solve(&puzzle), Ok(SolveOutcome::NoSolution));
    }

    #[test]
    fn test_solve_stops_at_malformed_input() {
        let puzzle = puzzle(vec![
            Variable::new(0, 0, Across, 3),
            Variable::new(0, 0, Down, 4),
        ], &["CAT", "DOG"]);
        let mut solver = Solver::new(&puzzle);

        assert_eq!(
            solver.solve(),
            Err(SolveError::MalformedInput { variable: Variable::new(0, 0, Down, 4) }),
        );
    }

    #[test]
    fn test_solve_reports_aborted_search() {
        let puzzle = Puzzle::from_structure_str(
            "___\n_#_\n___\n",
            WordList::new(["CAT", "COT", "TAN", "TEN", "NET", "OAT"]),
        ).unwrap();
        let config = SolverConfig { budget: SearchBudget::unlimited().with_max_states(0) };

        let outcome = Solver::with_config(&puzzle, config).solve().unwrap();

        assert!(matches!(outcome, SolveOutcome::Aborted { .. }));
        assert!(outcome.solution().is_none());
    }
}
