use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::domains::Domains;
use crate::puzzle::{Puzzle, VariableId};

/// An ordered pair `(x, y)` of crossing variables. Revising it makes `x` consistent with `y`.
pub type Arc = (VariableId, VariableId);

/// Every arc in the puzzle, variables and their neighbors both in declaration order.
pub fn all_arcs(puzzle: &Puzzle) -> Vec<Arc> {
    puzzle.variable_ids()
        .flat_map(|x| puzzle.neighbors(x).map(move |y| (x, y)))
        .collect()
}

/// Remove every word from `x`'s domain that has no partner in `y`'s domain agreeing on the shared
/// cell, and return how many were removed.
fn revise_counting(puzzle: &Puzzle, domains: &mut Domains, x: VariableId, y: VariableId) -> usize {
    let (x_cell, y_cell) = match puzzle.overlap(x, y) {
        Some(overlap) => overlap,
        None => return 0,
    };

    // The letters `y` can still put in the shared cell.
    let supported: FxHashSet<char> = domains.words(y)
        .filter_map(|word_id| puzzle.word(word_id).chars.get(y_cell).copied())
        .collect();

    domains.retain(x, |word_id| {
        puzzle.word(word_id).chars.get(x_cell).map_or(false, |c| supported.contains(c))
    })
}

/// Make `x` arc consistent with `y`. Returns whether `x`'s domain changed. Variables that don't
/// cross are trivially consistent.
pub fn revise(puzzle: &Puzzle, domains: &mut Domains, x: VariableId, y: VariableId) -> bool {
    revise_counting(puzzle, domains, x, y) > 0
}

/// Work queue of arcs still to be revised. An arc that is already waiting isn't queued a second
/// time; revising it once covers both requests.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<Arc>,
    queued: FxHashSet<Arc>,
}

impl ArcQueue {
    fn with_initial_queue<Items>(items: Items) -> ArcQueue
        where
            Items: IntoIterator<Item=Arc>
    {
        let mut queue = ArcQueue { queue: VecDeque::new(), queued: FxHashSet::default() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

/// Counts from a successful `ac3` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// Number of `revise` calls that removed something.
    pub revisions: usize,
    /// Number of words removed across all domains.
    pub removals: usize,
}

/// `ac3` emptied this variable's domain, so the puzzle can't be filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub variable_id: VariableId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// AC-3. Revise arcs in FIFO order, starting from `initial_arcs` or every arc in the puzzle if
/// that's `None`. Whenever `x` loses words, each other neighbor `z` of `x` gets `(z, x)` requeued.
/// Stops with a failure as soon as any domain is emptied.
pub fn ac3(
    puzzle: &Puzzle,
    domains: &mut Domains,
    initial_arcs: Option<&[Arc]>,
) -> ArcConsistencyResult {
    let mut queue = match initial_arcs {
        Some(arcs) => ArcQueue::with_initial_queue(arcs.iter().copied()),
        None => ArcQueue::with_initial_queue(all_arcs(puzzle)),
    };

    let mut success = ArcConsistencySuccess::default();

    while let Some((x, y)) = queue.pop_front() {
        let removed = revise_counting(puzzle, domains, x, y);
        if removed == 0 {
            continue;
        }

        success.revisions += 1;
        success.removals += removed;

        if domains.is_empty(x) {
            log::debug!(
                "Arc consistency emptied the domain of {} while revising against {}",
                puzzle.variable(x), puzzle.variable(y),
            );
            return Err(ArcConsistencyFailure { variable_id: x });
        }

        for z in puzzle.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    log::debug!(
        "Arc consistency made {} revisions removing {} candidates",
        success.revisions, success.removals,
    );

    Ok(success)
}
