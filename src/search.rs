use std::fmt::{Debug, Formatter};

use instant::{Duration, Instant};
use log::trace;

use crate::domains::Domains;
use crate::puzzle::{Puzzle, VariableId, WordId};

/// A mapping from variables to the words currently tried for them. `None` means unassigned.
#[derive(Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
}

impl Assignment {
    /// An assignment for `variable_count` variables with nothing assigned yet.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment { words: vec![None; variable_count] }
    }

    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.words[variable_id]
    }

    /// The assigned word's text, if any.
    pub fn word<'p>(&self, puzzle: &'p Puzzle, variable_id: VariableId) -> Option<&'p str> {
        self.get(variable_id).map(|word_id| puzzle.word(word_id).string.as_str())
    }

    pub fn assign(&mut self, variable_id: VariableId, word_id: WordId) {
        self.words[variable_id] = Some(word_id);
    }

    pub fn unassign(&mut self, variable_id: VariableId) {
        self.words[variable_id] = None;
    }

    pub fn is_assigned(&self, variable_id: VariableId) -> bool {
        self.words[variable_id].is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.words.iter().all(Option::is_some)
    }

    pub fn assigned_count(&self) -> usize {
        self.words.iter().filter(|word| word.is_some()).count()
    }

    /// Number of variables this assignment covers, assigned or not.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The assigned (variable, word) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item=(VariableId, WordId)> + '_ {
        self.words.iter()
            .enumerate()
            .filter_map(|(variable_id, word)| word.map(|word_id| (variable_id, word_id)))
    }
}

impl Debug for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Check every constraint touching `variable_id` against the rest of the assignment: its word
/// isn't used elsewhere, has the right length, and agrees with each assigned neighbor. If the rest
/// of the assignment was already consistent this is equivalent to `is_consistent`.
pub fn is_consistent_with(puzzle: &Puzzle, assignment: &Assignment, variable_id: VariableId) -> bool {
    let word_id = match assignment.get(variable_id) {
        Some(word_id) => word_id,
        None => return true,
    };

    if assignment.iter().any(|(other_id, other_word_id)| other_id != variable_id && other_word_id == word_id) {
        return false;
    }

    let word = puzzle.word(word_id);
    if word.len() != puzzle.variable(variable_id).length {
        return false;
    }

    puzzle.crossings(variable_id).iter().all(|crossing| {
        match assignment.get(crossing.other_variable_id) {
            Some(other_word_id) => {
                word.chars.get(crossing.cell) ==
                    puzzle.word(other_word_id).chars.get(crossing.other_cell)
            }
            None => true,
        }
    })
}

/// Does the (possibly partial) assignment satisfy every constraint? Unassigned variables are
/// ignored.
pub fn is_consistent(puzzle: &Puzzle, assignment: &Assignment) -> bool {
    assignment.iter().all(|(variable_id, _)| is_consistent_with(puzzle, assignment, variable_id))
}

/// Limits on how much work a search may do. Unbounded by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of search states (variables selected) to visit.
    pub max_states: Option<u64>,
    /// Maximum wall-clock time for the search.
    pub time_limit: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> SearchBudget {
        SearchBudget::default()
    }

    pub fn with_max_states(self, max_states: u64) -> SearchBudget {
        SearchBudget { max_states: Some(max_states), ..self }
    }

    pub fn with_time_limit(self, time_limit: Duration) -> SearchBudget {
        SearchBudget { time_limit: Some(time_limit), ..self }
    }
}

/// A struct tracking statistics about the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub states: u64,
    pub consistency_checks: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Assignment),
    Exhausted,
    Aborted,
}

/// The budget ran out; unwinds the whole search.
#[derive(Debug)]
struct SearchAborted;

/// Depth-first backtracking search over a fixed set of domains.
pub struct Search<'a> {
    puzzle: &'a Puzzle,
    domains: &'a Domains,

    /// For each variable, how many other variables have a domain sharing a word with it. Domains
    /// don't change during search, so this is computed once.
    degrees: Vec<usize>,

    assignment: Assignment,
    budget: SearchBudget,
    start: Instant,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    pub fn new(puzzle: &'a Puzzle, domains: &'a Domains, budget: SearchBudget) -> Search<'a> {
        let degrees = puzzle.variable_ids().map(|variable_id| {
            puzzle.variable_ids()
                .filter(|&other_id| other_id != variable_id && domains.shares_word(variable_id, other_id))
                .count()
        }).collect();

        Search {
            puzzle,
            domains,
            degrees,
            assignment: Assignment::new(puzzle.variables().len()),
            budget,
            start: Instant::now(),
            statistics: Statistics::default(),
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Number of other variables whose domain has a word in common with this one's.
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.degrees[variable_id]
    }

    /// Pick the unassigned variable with the fewest remaining values, preferring higher degree and
    /// then earlier declaration on ties. `None` once everything is assigned.
    pub fn select_unassigned_variable(&self) -> Option<VariableId> {
        self.puzzle.variable_ids()
            .filter(|&variable_id| !self.assignment.is_assigned(variable_id))
            .min_by_key(|&variable_id| {
                (self.domains.len(variable_id), std::cmp::Reverse(self.degree(variable_id)))
            })
    }

    /// The variable's domain ordered by how many words each choice leaves unequal to it in the
    /// domains of unassigned neighbors, smallest first. Ties keep word list order.
    pub fn order_domain_values(&self, variable_id: VariableId) -> Vec<WordId> {
        let unassigned_neighbors: Vec<VariableId> = self.puzzle.neighbors(variable_id)
            .filter(|&neighbor_id| !self.assignment.is_assigned(neighbor_id))
            .collect();

        let mut values: Vec<WordId> = self.domains.words(variable_id).collect();
        values.sort_by_cached_key(|&word_id| {
            unassigned_neighbors.iter().map(|&neighbor_id| {
                self.domains.len(neighbor_id) - usize::from(self.domains.contains(neighbor_id, word_id))
            }).sum::<usize>()
        });

        values
    }

    /// Run the search to completion, exhaustion, or the end of the budget.
    pub fn run(mut self) -> (SearchOutcome, Statistics) {
        self.start = Instant::now();

        let outcome = match self.backtrack() {
            Ok(true) => SearchOutcome::Found(self.assignment.clone()),
            Ok(false) => SearchOutcome::Exhausted,
            Err(SearchAborted) => SearchOutcome::Aborted,
        };

        self.statistics.duration = self.start.elapsed();
        (outcome, self.statistics)
    }

    fn check_budget(&self) -> Result<(), SearchAborted> {
        let out_of_states = self.budget.max_states
            .map_or(false, |max_states| self.statistics.states > max_states);
        let out_of_time = self.budget.time_limit
            .map_or(false, |time_limit| self.start.elapsed() > time_limit);

        if out_of_states || out_of_time {
            log::warn!("Search budget exhausted after {} states", self.statistics.states);
            return Err(SearchAborted);
        }

        Ok(())
    }

    fn backtrack(&mut self) -> Result<bool, SearchAborted> {
        let variable_id = match self.select_unassigned_variable() {
            Some(variable_id) => variable_id,
            None => return Ok(true),
        };

        self.statistics.states += 1;
        self.check_budget()?;

        trace!(
            "State {}: filling {} with {} assigned",
            self.statistics.states,
            self.puzzle.variable(variable_id),
            self.assignment.assigned_count(),
        );

        for word_id in self.order_domain_values(variable_id) {
            self.assignment.assign(variable_id, word_id);
            self.statistics.consistency_checks += 1;

            if is_consistent_with(self.puzzle, &self.assignment, variable_id) && self.backtrack()? {
                return Ok(true);
            }

            self.assignment.unassign(variable_id);
        }

        self.statistics.backtracks += 1;
        Ok(false)
    }
}
