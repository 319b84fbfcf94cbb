use bit_set::BitSet;

use crate::errors::SolveError;
use crate::puzzle::{Puzzle, VariableId, WordId};

/// The words each variable could still take. Propagation only ever removes words; search reads
/// the domains but never changes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    /// Indexed by `VariableId`; each set holds `WordId`s.
    by_variable: Vec<BitSet>,
}

impl Domains {
    /// Start every variable off with the whole word list.
    pub fn new(puzzle: &Puzzle) -> Domains {
        let all_words: BitSet = (0..puzzle.word_list().len()).collect();

        Domains {
            by_variable: puzzle.variable_ids().map(|_| all_words.clone()).collect(),
        }
    }

    pub fn get(&self, variable_id: VariableId) -> &BitSet {
        &self.by_variable[variable_id]
    }

    /// Word ids in the variable's domain, in word list order.
    pub fn words(&self, variable_id: VariableId) -> impl Iterator<Item=WordId> + '_ {
        self.by_variable[variable_id].iter()
    }

    pub fn len(&self, variable_id: VariableId) -> usize {
        self.by_variable[variable_id].len()
    }

    pub fn is_empty(&self, variable_id: VariableId) -> bool {
        self.by_variable[variable_id].is_empty()
    }

    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.by_variable[variable_id].contains(word_id)
    }

    /// Total number of (variable, word) pairs still possible.
    pub fn total_len(&self) -> usize {
        self.by_variable.iter().map(BitSet::len).sum()
    }

    /// Do the two variables have at least one candidate word in common?
    pub fn shares_word(&self, a: VariableId, b: VariableId) -> bool {
        !self.by_variable[a].is_disjoint(&self.by_variable[b])
    }

    /// Remove every word from the variable's domain that fails `keep`, returning how many were
    /// removed.
    pub fn retain<F>(&mut self, variable_id: VariableId, mut keep: F) -> usize
        where
            F: FnMut(WordId) -> bool
    {
        let domain = &mut self.by_variable[variable_id];
        let doomed: Vec<WordId> = domain.iter().filter(|&word_id| !keep(word_id)).collect();

        for &word_id in &doomed {
            domain.remove(word_id);
        }

        doomed.len()
    }

    /// Restrict each variable to words of its own length. A variable left with nothing means the
    /// word list can never fill this grid, which we report as malformed input rather than as an
    /// ordinary failed search.
    pub fn enforce_node_consistency(&mut self, puzzle: &Puzzle) -> Result<usize, SolveError> {
        let mut removed = 0;

        for variable_id in puzzle.variable_ids() {
            let length = puzzle.variable(variable_id).length;
            removed += self.retain(variable_id, |word_id| puzzle.word(word_id).len() == length);

            if self.is_empty(variable_id) {
                return Err(SolveError::MalformedInput { variable: *puzzle.variable(variable_id) });
            }
        }

        log::debug!("Node consistency removed {} candidates", removed);

        Ok(removed)
    }
}
