use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::generator::{generate_case, CaseConfig};
use crate::problem::{format_answer, solve, Problem};
use crate::ranker::Strategy;

/// Result of running one strategy on one problem.
#[derive(Clone, Debug)]
pub struct Run {
    pub strategy: Strategy,
    pub elapsed: Duration,
    pub answers: Vec<Option<usize>>,
}

/// Every strategy's run on the same problem. The first run is the reference
/// that the others are checked against.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub runs: Vec<Run>,
}

/// First query on which a strategy disagrees with the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub strategy: Strategy,
    pub query_index: usize,
    pub expected: Option<usize>,
    pub got: Option<usize>,
}

impl Comparison {
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let Some((reference, rest)) = self.runs.split_first() else {
            return Vec::new();
        };
        rest.iter()
            .filter_map(|run| {
                let query_index = first_difference(&reference.answers, &run.answers)?;
                Some(Mismatch {
                    strategy: run.strategy,
                    query_index,
                    expected: reference.answers.get(query_index).copied().flatten(),
                    got: run.answers.get(query_index).copied().flatten(),
                })
            })
            .collect()
    }

    pub fn agrees(&self) -> bool {
        self.mismatches().is_empty()
    }

    /// Strategies that took more than `ratio` times as long as the fastest.
    pub fn slow_strategies(&self, ratio: f64) -> Vec<Strategy> {
        let Some(fastest) = self.runs.iter().map(|run| run.elapsed).min() else {
            return Vec::new();
        };
        // Keep sub-microsecond runs from making every ratio look huge.
        let floor = fastest.max(Duration::from_micros(1)).as_secs_f64();
        self.runs
            .iter()
            .filter(|run| run.elapsed.as_secs_f64() > floor * ratio)
            .map(|run| run.strategy)
            .collect()
    }
}

fn first_difference(expected: &[Option<usize>], got: &[Option<usize>]) -> Option<usize> {
    expected
        .iter()
        .zip(got)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != got.len()).then(|| expected.len().min(got.len())))
}

/// Runs every strategy on `problem`, timing each.
pub fn compare(problem: &Problem, strategies: &[Strategy]) -> Comparison {
    let runs = strategies
        .iter()
        .map(|&strategy| {
            let start = Instant::now();
            let answers = solve(problem, strategy);
            let elapsed = start.elapsed();
            debug!(%strategy, ?elapsed, "ran strategy");
            Run {
                strategy,
                elapsed,
                answers,
            }
        })
        .collect();
    Comparison { runs }
}

/// Compares strategies on `count` random cases drawn from `config`.
/// Returns the failing cases.
pub fn random_compare(
    count: usize,
    seed: u64,
    config: &CaseConfig,
    strategies: &[Strategy],
) -> Result<Vec<(Problem, Vec<Mismatch>)>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut failures = Vec::new();
    for case in 0..count {
        let (problem, _) = generate_case(config, &mut rng)?;
        let mismatches = compare(&problem, strategies).mismatches();
        if !mismatches.is_empty() {
            warn!(case, ?mismatches, "strategies disagree");
            failures.push((problem, mismatches));
        }
    }
    Ok(failures)
}

/// Judge verdict for one test file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    WrongAnswer {
        line: usize,
        expected: String,
        got: String,
    },
    TimeLimitExceeded {
        elapsed: Duration,
    },
    InvalidInput(String),
}

/// Every `*.in` file directly under `dir`, sorted by path.
pub fn input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("in"))
        .collect::<Vec<_>>();
    inputs.sort();
    Ok(inputs)
}

/// Runs every strategy on each `*.in` under `dir`. Malformed inputs are
/// skipped with a warning.
pub fn compare_dir(dir: &Path, strategies: &[Strategy]) -> Result<Vec<(PathBuf, Comparison)>> {
    let mut comparisons = Vec::new();
    for input_path in input_files(dir)? {
        let input = fs::read_to_string(&input_path)
            .with_context(|| format!("failed to read {}", input_path.display()))?;
        match Problem::parse(&input) {
            Ok(problem) => comparisons.push((input_path, compare(&problem, strategies))),
            Err(err) => warn!(path = %input_path.display(), %err, "skipping malformed input"),
        }
    }
    Ok(comparisons)
}

/// Solves every `*.in` under `dir` that has a sibling `.ans` and compares the
/// output token by token. Inputs without an answer file are skipped.
///
/// A run slower than `time_limit` is judged [`Verdict::TimeLimitExceeded`]
/// without looking at its answers.
pub fn check_dir(
    dir: &Path,
    strategy: Strategy,
    time_limit: Option<Duration>,
) -> Result<Vec<(PathBuf, Verdict)>> {
    let inputs = input_files(dir)?;

    let mut verdicts = Vec::with_capacity(inputs.len());
    for input_path in inputs {
        let answer_path = input_path.with_extension("ans");
        if !answer_path.is_file() {
            debug!(path = %input_path.display(), "no answer file, skipping");
            continue;
        }
        let input = fs::read_to_string(&input_path)
            .with_context(|| format!("failed to read {}", input_path.display()))?;
        let expected = fs::read_to_string(&answer_path)
            .with_context(|| format!("failed to read {}", answer_path.display()))?;
        let problem = match Problem::parse(&input) {
            Ok(problem) => problem,
            Err(err) => {
                verdicts.push((input_path, Verdict::InvalidInput(err.to_string())));
                continue;
            }
        };

        let start = Instant::now();
        let answers = solve(&problem, strategy);
        let elapsed = start.elapsed();
        let verdict = match time_limit {
            Some(limit) if elapsed > limit => Verdict::TimeLimitExceeded { elapsed },
            _ => {
                let got = answers.into_iter().map(format_answer).collect::<Vec<_>>();
                judge(&expected, &got)
            }
        };
        verdicts.push((input_path, verdict));
    }
    Ok(verdicts)
}

fn judge(expected: &str, got: &[String]) -> Verdict {
    let mut expected = expected.split_whitespace();
    let mut got = got.iter().map(String::as_str);
    let mut line = 0;
    loop {
        line += 1;
        match (expected.next(), got.next()) {
            (None, None) => return Verdict::Accepted,
            (e, g) if e == g => continue,
            (e, g) => {
                return Verdict::WrongAnswer {
                    line,
                    expected: e.unwrap_or("<eof>").to_string(),
                    got: g.unwrap_or("<eof>").to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: Strategy, micros: u64, answers: Vec<Option<usize>>) -> Run {
        Run {
            strategy,
            elapsed: Duration::from_micros(micros),
            answers,
        }
    }

    #[test]
    fn all_strategies_agree() {
        let problem = Problem::new(vec![9, 1, 9, 4, -2], vec![9, 4, 0, -2, 1]);
        let comparison = compare(&problem, &Strategy::ALL);
        assert_eq!(comparison.runs.len(), 4);
        assert!(comparison.agrees());
    }

    #[test]
    fn reports_first_mismatch() {
        let comparison = Comparison {
            runs: vec![
                run(Strategy::Index, 10, vec![Some(1), None, Some(2)]),
                run(Strategy::Map, 10, vec![Some(1), Some(3), Some(2)]),
                run(Strategy::Naive, 10, vec![Some(1), None]),
            ],
        };
        assert_eq!(
            comparison.mismatches(),
            vec![
                Mismatch {
                    strategy: Strategy::Map,
                    query_index: 1,
                    expected: None,
                    got: Some(3),
                },
                Mismatch {
                    strategy: Strategy::Naive,
                    query_index: 2,
                    expected: Some(2),
                    got: None,
                },
            ]
        );
    }

    #[test]
    fn flags_slow_runs() {
        let comparison = Comparison {
            runs: vec![
                run(Strategy::Index, 100, vec![]),
                run(Strategy::Map, 150, vec![]),
                run(Strategy::Naive, 5_000, vec![]),
            ],
        };
        assert_eq!(comparison.slow_strategies(10.0), vec![Strategy::Naive]);
        assert!(Comparison { runs: vec![] }.slow_strategies(10.0).is_empty());
    }

    #[test]
    fn random_cases_agree() {
        let config = CaseConfig::new(40, 60, 30);
        let failures = random_compare(20, 42, &config, &Strategy::ALL).unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn judge_tokens() {
        let got = vec!["1".to_string(), "-1".to_string()];
        assert_eq!(judge("1\n-1\n", &got), Verdict::Accepted);
        assert_eq!(
            judge("1 2", &got),
            Verdict::WrongAnswer {
                line: 2,
                expected: "2".to_string(),
                got: "-1".to_string()
            }
        );
        assert_eq!(
            judge("1 -1 3", &got),
            Verdict::WrongAnswer {
                line: 3,
                expected: "3".to_string(),
                got: "<eof>".to_string()
            }
        );
    }

    #[test]
    fn check_generated_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.in"), "4\n5 3 3 1\n5\n5\n3\n1\n2\n3").unwrap();
        fs::write(dir.path().join("a.ans"), "1\n2\n4\n-1\n2").unwrap();
        fs::write(dir.path().join("b.in"), "1 7 1 7").unwrap();
        fs::write(dir.path().join("b.ans"), "2").unwrap();
        fs::write(dir.path().join("c.in"), "0 0").unwrap();

        let verdicts = check_dir(dir.path(), Strategy::Index, None).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0], (dir.path().join("a.in"), Verdict::Accepted));
        assert!(matches!(verdicts[1].1, Verdict::WrongAnswer { line: 1, .. }));
    }

    #[test]
    fn malformed_input_is_a_verdict() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.in"), "1 7 1 7").unwrap();
        fs::write(dir.path().join("a.ans"), "1").unwrap();
        fs::write(dir.path().join("b.in"), "2 1").unwrap();
        fs::write(dir.path().join("b.ans"), "1").unwrap();

        let verdicts = check_dir(dir.path(), Strategy::Index, None).unwrap();
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].1, Verdict::Accepted);
        assert!(matches!(&verdicts[1].1, Verdict::InvalidInput(msg) if msg.contains("value")));
    }

    #[test]
    fn slow_strategy_exceeds_time_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let (problem, answers) = generate_case(&CaseConfig::new(300, 50, 10_000), &mut rng).unwrap();
        fs::write(dir.path().join("a.in"), problem.to_input_string()).unwrap();
        fs::write(
            dir.path().join("a.ans"),
            crate::generator::answers_to_string(&answers),
        )
        .unwrap();

        let verdicts = check_dir(dir.path(), Strategy::Bubble, Some(Duration::from_nanos(1))).unwrap();
        assert!(matches!(verdicts[0].1, Verdict::TimeLimitExceeded { .. }));

        let verdicts = check_dir(dir.path(), Strategy::Bubble, None).unwrap();
        assert_eq!(verdicts[0].1, Verdict::Accepted);
    }

    #[test]
    fn compare_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.in"), "3 4 4 -2 3 4 -2 0").unwrap();
        fs::write(dir.path().join("b.in"), "x").unwrap();
        fs::write(dir.path().join("b.ans"), "1").unwrap();

        let comparisons = compare_dir(dir.path(), &Strategy::ALL).unwrap();
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].0, dir.path().join("a.in"));
        assert!(comparisons[0].1.agrees());
        assert_eq!(comparisons[0].1.runs[0].answers, vec![Some(1), Some(3), None]);
    }
}
