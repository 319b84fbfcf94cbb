use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use crossfill::{render_grid, save_image, Puzzle, SearchBudget, SolveOutcome, Solver, SolverConfig};

/// Fill a crossword grid from a word list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Grid structure file: `_` marks a fillable cell, anything else a block
    structure: PathBuf,

    /// Word list file, one word per line
    words: PathBuf,

    /// Also write the filled grid to this file: drawn as an image if it ends in `.png`, as text
    /// otherwise
    output: Option<PathBuf>,

    /// Give up after visiting this many search states
    #[arg(long)]
    max_states: Option<u64>,

    /// Give up after searching for this many seconds
    #[arg(long, value_parser = parse_time_limit)]
    time_limit: Option<Duration>,

    /// Log at debug level (also enabled by setting CROSSFILL_DEBUG)
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn solver_config(&self) -> SolverConfig {
        let mut budget = SearchBudget::unlimited();
        if let Some(max_states) = self.max_states {
            budget = budget.with_max_states(max_states);
        }
        if let Some(time_limit) = self.time_limit {
            budget = budget.with_time_limit(time_limit);
        }
        SolverConfig { budget }
    }
}

fn parse_time_limit(arg: &str) -> Result<Duration, String> {
    let seconds: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("{seconds} seconds: {e}"))
}

fn is_image_path(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("png"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug_enabled = cli.debug || std::env::var(crossfill::log::DEBUG_ENV_VAR).is_ok();
    crossfill::log::init_logger(debug_enabled);

    match try_main(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let puzzle = Puzzle::load(&cli.structure, &cli.words)?;

    let outcome = Solver::with_config(&puzzle, cli.solver_config()).solve()?;

    match outcome {
        SolveOutcome::Solved(solution) => {
            let display_grid = render_grid(&puzzle, &solution.assignment);
            println!("{}", display_grid);

            if let Some(output) = &cli.output {
                if is_image_path(output) {
                    save_image(&puzzle, &solution.assignment, output)?;
                } else {
                    fs::write(output, display_grid + "\n")?;
                }
                log::info!("Wrote grid to {}", output.display());
            }

            Ok(ExitCode::SUCCESS)
        }
        SolveOutcome::NoSolution => {
            println!("No solution.");
            Ok(ExitCode::SUCCESS)
        }
        SolveOutcome::Aborted { statistics } => {
            eprintln!(
                "Search budget exhausted after {} states in {:.3}s; no answer either way.",
                statistics.states,
                statistics.duration.as_secs_f64(),
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use clap::Parser;

    use super::{is_image_path, parse_time_limit, Cli};

    #[test]
    fn test_time_limit_rejects_unrepresentable_values() {
        assert_eq!(parse_time_limit("1.5"), Ok(Duration::from_millis(1500)));
        assert_eq!(parse_time_limit("0"), Ok(Duration::ZERO));
        assert!(parse_time_limit("inf").is_err());
        assert!(parse_time_limit("1e300").is_err());
        assert!(parse_time_limit("-1").is_err());
        assert!(parse_time_limit("NaN").is_err());
        assert!(parse_time_limit("soon").is_err());

        assert!(Cli::try_parse_from(["crossfill", "s.txt", "w.txt", "--time-limit", "inf"]).is_err());
        let cli = Cli::try_parse_from(["crossfill", "s.txt", "w.txt", "--time-limit", "2"]).unwrap();
        assert_eq!(cli.solver_config().budget.time_limit, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_png_output_is_drawn_as_image() {
        assert!(is_image_path(Path::new("out/grid.png")));
        assert!(is_image_path(Path::new("GRID.PNG")));
        assert!(!is_image_path(Path::new("grid.txt")));
        assert!(!is_image_path(Path::new("png")));
    }
}
