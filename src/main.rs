use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::{
    fs::File,
    io::{self, BufWriter},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rankquery::compare::{check_dir, compare, compare_dir, random_compare, Verdict};
use rankquery::generator::{self, CaseConfig};
use rankquery::validator::{validate, Limits};
use rankquery::{solve, write_answers, Problem, Strategy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer rank queries read from a file or stdin
    Solve {
        /// Ranking algorithm to use
        #[arg(short, long, value_enum, default_value_t = Strategy::Index)]
        strategy: Strategy,

        /// Path to the input, stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Write random test cases with expected answers
    Generate {
        /// Directory to write the cases into
        #[arg(short, long)]
        dir: PathBuf,

        /// File name prefix of each case
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Number of cases to write
        #[arg(short, long, default_value_t = 20)]
        count: usize,

        /// Seed for the random number generator
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// JSON list of {"m", "n", "max_value"} to use instead of the built-in plan
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Check that an input is well formed
    Validate {
        /// Path to the input, stdin if omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Run every strategy on random cases and report disagreements and slow ones
    Compare {
        /// Number of random cases
        #[arg(short, long, default_value_t = 100)]
        count: usize,

        /// Seed for the random number generator
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Number of values in each random case
        #[arg(short, default_value_t = 1_000)]
        m: usize,

        /// Number of queries in each random case
        #[arg(short, default_value_t = 1_000)]
        n: usize,

        /// Random values are drawn from -max_value..=max_value
        #[arg(long, default_value_t = 1_000_000)]
        max_value: i64,

        /// Compare on the `.in` files in this directory instead of random cases
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Flag strategies slower than the fastest by this factor
        #[arg(long, default_value_t = 10.0)]
        ratio: f64,
    },

    /// Judge a strategy against every `.in`/`.ans` pair in a directory
    Check {
        /// Directory holding the test files
        #[arg(short, long)]
        dir: PathBuf,

        /// Ranking algorithm to judge
        #[arg(short, long, value_enum, default_value_t = Strategy::Index)]
        strategy: Strategy,

        /// Time limit per case in seconds
        #[arg(short, long)]
        tle: Option<f64>,
    },
}

fn read_problem(input: Option<PathBuf>) -> Result<Problem> {
    match input {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            Problem::read_from(file)
        }
        None => Problem::read_from(io::stdin().lock()),
    }
}

fn read_text(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => Ok(io::read_to_string(io::stdin().lock())?),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match args.command {
        Command::Solve { strategy, input } => {
            if strategy.is_reference() {
                warn!(%strategy, "using a reference strategy, expect it to be slow");
            }
            let problem = read_problem(input)?;
            let answers = solve(&problem, strategy);
            write_answers(BufWriter::new(io::stdout().lock()), &answers)?;
        }
        Command::Generate {
            dir,
            prefix,
            count,
            seed,
            plan,
        } => {
            let plan = match plan {
                Some(path) => generator::load_plan(path)?,
                None => generator::default_plan(),
            };
            let mut rng = StdRng::seed_from_u64(seed);
            let written = generator::write_cases(&dir, &prefix, &plan, count, &mut rng)?;
            println!("wrote {} cases to {}", written.len(), dir.display());
        }
        Command::Validate { input } => {
            let text = read_text(input)?;
            validate(&text, &Limits::default()).context("Input is invalid")?;
            println!("Input is valid");
        }
        Command::Compare {
            count,
            seed,
            m,
            n,
            max_value,
            dir,
            ratio,
        } => {
            if let Some(dir) = dir {
                let mut disagreed = 0;
                for (path, comparison) in compare_dir(&dir, &Strategy::ALL)? {
                    for mismatch in comparison.mismatches() {
                        disagreed += 1;
                        println!(
                            "{} {} disagrees at query {}: expected {:?}, got {:?}",
                            path.display(),
                            mismatch.strategy,
                            mismatch.query_index,
                            mismatch.expected,
                            mismatch.got
                        );
                    }
                    for strategy in comparison.slow_strategies(ratio) {
                        println!("{} {strategy} is more than {ratio}x slower than the fastest", path.display());
                    }
                }
                if disagreed > 0 {
                    bail!("{} disagreements in {}", disagreed, dir.display());
                }
                return Ok(());
            }

            let config = CaseConfig::new(m, n, max_value);
            let failures = random_compare(count, seed, &config, &Strategy::ALL)?;
            for (problem, mismatches) in &failures {
                for mismatch in mismatches {
                    println!(
                        "{} disagrees at query {} (value {}): expected {:?}, got {:?}",
                        mismatch.strategy,
                        mismatch.query_index,
                        problem.queries[mismatch.query_index],
                        mismatch.expected,
                        mismatch.got
                    );
                }
            }

            // Time one more case on its own so the numbers are comparable.
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(count as u64));
            let (problem, _) = generator::generate_case(&config, &mut rng)?;
            let comparison = compare(&problem, &Strategy::ALL);
            for run in &comparison.runs {
                println!("{:>8} {:?}", run.strategy, run.elapsed);
            }
            for strategy in comparison.slow_strategies(ratio) {
                println!("{strategy} is more than {ratio}x slower than the fastest");
            }

            if !failures.is_empty() {
                bail!("{} of {} cases disagreed", failures.len(), count);
            }
            info!(count, "all strategies agree");
        }
        Command::Check { dir, strategy, tle } => {
            let time_limit = tle
                .map(Duration::try_from_secs_f64)
                .transpose()
                .context("invalid time limit")?;
            let verdicts = check_dir(&dir, strategy, time_limit)?;
            let mut failed = 0;
            for (path, verdict) in &verdicts {
                match verdict {
                    Verdict::Accepted => println!("AC {}", path.display()),
                    Verdict::WrongAnswer {
                        line,
                        expected,
                        got,
                    } => {
                        failed += 1;
                        println!(
                            "WA {} line {}: expected {}, got {}",
                            path.display(),
                            line,
                            expected,
                            got
                        );
                    }
                    Verdict::TimeLimitExceeded { elapsed } => {
                        failed += 1;
                        println!("TLE {} {:?}", path.display(), elapsed);
                    }
                    Verdict::InvalidInput(err) => {
                        failed += 1;
                        println!("INVALID {} {}", path.display(), err);
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} cases failed", failed, verdicts.len());
            }
        }
    }
    Ok(())
}
