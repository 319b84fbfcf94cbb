use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crossfill::{solve, Puzzle, WordList};

pub fn criterion_benchmark(c: &mut Criterion) {
    let structure = std::fs::read_to_string("./tests/fixtures/structure1.txt")
        .expect("failed to read structure");
    let words = WordList::load_from_path("./tests/fixtures/words1.txt")
        .expect("failed to read words");
    let puzzle = Puzzle::from_structure_str(&structure, words).expect("failed to parse puzzle");

    c.bench_function("solve_5x5_template", |b| {
        b.iter(|| {
            assert!(solve(black_box(&puzzle)).expect("malformed puzzle").solution().is_some());
        });
    });

    // The same grid with more near misses in the word list.
    let puzzle = Puzzle::from_structure_str(
        &structure,
        WordList::parse_from_str("cat\ncot\ntea\neon\ncrane\ntrain\nbanal\nstone\nplane\nnasal\n"),
    ).expect("failed to parse puzzle");

    c.bench_function("solve_5x5_template_near_misses", |b| {
        b.iter(|| {
            solve(black_box(&puzzle)).expect("malformed puzzle");
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
