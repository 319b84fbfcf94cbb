//! Property tests over small random grids and word lists.

use crossfill::arc_consistency::ac3;
use crossfill::search::{is_consistent, is_consistent_with};
use crossfill::{solve, Assignment, Domains, Puzzle, SolveError, SolveOutcome, WordList};
use proptest::prelude::*;

/// A 3x3 grid of fillable/blocked cells and a handful of short words over a tiny alphabet, so that
/// crossings often conflict and brute force stays cheap.
fn arb_puzzle() -> impl Strategy<Value=Puzzle> {
    (
        prop::collection::vec(prop::collection::vec(any::<bool>(), 3), 3),
        prop::collection::vec("[ab]{2,3}", 1..7),
    ).prop_map(|(cells, words)| {
        let structure: String = cells.iter()
            .map(|row| row.iter().map(|&open| if open { '_' } else { '#' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");

        Puzzle::from_structure_str(&structure, WordList::new(words))
            .expect("generated structure is always a valid 3x3 grid")
    })
}

/// Plain depth-first enumeration in declaration order with no heuristics or propagation.
fn brute_force(puzzle: &Puzzle, assignment: &mut Assignment, next: usize) -> bool {
    if next == puzzle.variables().len() {
        return true;
    }

    for word_id in 0..puzzle.word_list().len() {
        assignment.assign(next, word_id);
        if is_consistent_with(puzzle, assignment, next) && brute_force(puzzle, assignment, next + 1) {
            return true;
        }
        assignment.unassign(next);
    }

    false
}

fn node_consistent(puzzle: &Puzzle) -> Result<Domains, SolveError> {
    let mut domains = Domains::new(puzzle);
    domains.enforce_node_consistency(puzzle)?;
    Ok(domains)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Running node consistency a second time changes nothing.
    #[test]
    fn test_node_consistency_idempotent(puzzle in arb_puzzle()) {
        if let Ok(mut domains) = node_consistent(&puzzle) {
            let once = domains.clone();
            prop_assert_eq!(domains.enforce_node_consistency(&puzzle), Ok(0));
            prop_assert_eq!(domains, once);
        }
    }

    /// After a successful AC-3 run every remaining word has a partner in each neighbor's domain,
    /// and no domain grew.
    #[test]
    fn test_ac3_sound_and_monotonic(puzzle in arb_puzzle()) {
        if let Ok(mut domains) = node_consistent(&puzzle) {
            let before = domains.clone();
            let result = ac3(&puzzle, &mut domains, None);

            for variable_id in puzzle.variable_ids() {
                prop_assert!(before.get(variable_id).is_superset(domains.get(variable_id)));
            }

            if result.is_ok() {
                for x in puzzle.variable_ids() {
                    for y in puzzle.neighbors(x) {
                        let (i, j) = puzzle.overlap(x, y).unwrap();
                        for vx in domains.words(x) {
                            let supported = domains.words(y).any(|vy| {
                                puzzle.word(vx).chars[i] == puzzle.word(vy).chars[j]
                            });
                            prop_assert!(supported);
                        }
                    }
                }
            }
        }
    }

    /// Every solution is complete, uses no word twice, and agrees at every crossing; and a
    /// solution is found exactly when one exists.
    #[test]
    fn test_solutions_valid_and_search_complete(puzzle in arb_puzzle()) {
        let exists = brute_force(&puzzle, &mut Assignment::new(puzzle.variables().len()), 0);

        match solve(&puzzle) {
            Ok(SolveOutcome::Solved(solution)) => {
                let assignment = &solution.assignment;
                prop_assert!(exists);
                prop_assert!(assignment.is_complete());
                prop_assert!(is_consistent(&puzzle, assignment));

                let mut words: Vec<_> = assignment.iter().map(|(_, word_id)| word_id).collect();
                words.sort();
                words.dedup();
                prop_assert_eq!(words.len(), puzzle.variables().len());

                for x in puzzle.variable_ids() {
                    for y in puzzle.neighbors(x) {
                        let (i, j) = puzzle.overlap(x, y).unwrap();
                        let vx = puzzle.word(assignment.get(x).unwrap());
                        let vy = puzzle.word(assignment.get(y).unwrap());
                        prop_assert_eq!(vx.chars[i], vy.chars[j]);
                    }
                }
            }
            Ok(SolveOutcome::NoSolution) | Err(SolveError::MalformedInput { .. }) => {
                prop_assert!(!exists);
            }
            Ok(SolveOutcome::Aborted { .. }) => prop_assert!(false, "unbounded search aborted"),
        }
    }

    /// The incremental check agrees with the full check on assignments built in order.
    #[test]
    fn test_incremental_consistency_matches_full_check(
        puzzle in arb_puzzle(),
        choices in prop::collection::vec(0usize..7, 6),
    ) {
        let mut assignment = Assignment::new(puzzle.variables().len());

        for (variable_id, &choice) in puzzle.variable_ids().zip(&choices) {
            if !is_consistent(&puzzle, &assignment) {
                break;
            }
            assignment.assign(variable_id, choice % puzzle.word_list().len());
            prop_assert_eq!(
                is_consistent_with(&puzzle, &assignment, variable_id),
                is_consistent(&puzzle, &assignment),
            );
        }
    }
}
