use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::problem::{format_answer, Problem};
use crate::RankIndex;

/// Size parameters of one generated case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaseConfig {
    /// Number of values.
    pub m: usize,
    /// Number of queries.
    pub n: usize,
    /// Values are drawn from `-max_value..=max_value`.
    pub max_value: i64,
}

impl CaseConfig {
    pub const fn new(m: usize, n: usize, max_value: i64) -> Self {
        CaseConfig { m, n, max_value }
    }

    /// Number of integers in `-max_value..=max_value`.
    fn span(&self) -> u64 {
        2 * self.max_value as u64 + 1
    }
}

/// The sample case comes first, then cases graded from small to the largest
/// sizes and value ranges.
pub fn default_plan() -> Vec<CaseConfig> {
    vec![
        CaseConfig::new(5, 3, 6),
        CaseConfig::new(10, 5, 100),
        CaseConfig::new(100, 50, 1_000),
        CaseConfig::new(1_000, 500, 10_000),
        CaseConfig::new(10_000, 1_000, 100_000),
        CaseConfig::new(100_000, 100_000, 1_000_000),
        CaseConfig::new(100, 100, 100),
        CaseConfig::new(10_000, 100, 1_000),
        CaseConfig::new(10, 100_000, 10),
        CaseConfig::new(50_000, 50_000, 100_000),
        CaseConfig::new(100_000, 1, 1_000_000),
        CaseConfig::new(2, 100_000, 10),
        CaseConfig::new(100_000, 100_000, 2_147_483_647),
        CaseConfig::new(100_000, 100_000, 1_000),
        CaseConfig::new(10_000, 10_000, 5_000),
        CaseConfig::new(10_000, 10_000, 500_000),
        CaseConfig::new(50_000, 50_000, 25_000),
        CaseConfig::new(10_000, 10_000, 100_000),
        CaseConfig::new(10_000, 10_000, 100_000),
        CaseConfig::new(10_000, 10_000, 10_000),
    ]
}

/// Reads a JSON array of [`CaseConfig`]s.
pub fn load_plan<P: AsRef<Path>>(path: P) -> Result<Vec<CaseConfig>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read plan {}", path.display()))?;
    let plan = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse plan {}", path.display()))?;
    Ok(plan)
}

/// Generates one case and its expected answers.
///
/// The values are `m` distinct integers when the range holds that many, and
/// uniform draws with repeats otherwise. The queries are every value plus up
/// to `n` absent integers, shuffled, then padded with uniform random integers
/// or truncated so that there are exactly `n` of them.
pub fn generate_case<R: Rng>(
    config: &CaseConfig,
    rng: &mut R,
) -> Result<(Problem, Vec<Option<usize>>)> {
    if config.max_value < 0 {
        bail!("max_value must not be negative, got {}", config.max_value);
    }
    let span = config.span();
    let low = -config.max_value;

    // Distinct values while the range allows it, otherwise the range is
    // too narrow and values repeat.
    let values: Vec<i64> = if config.m as u64 <= span {
        index::sample(rng, span as usize, config.m)
            .into_iter()
            // The sum lies in `low..=max_value` even when `i` does not fit i64.
            .map(|i| low.wrapping_add(i as i64))
            .collect()
    } else {
        (0..config.m)
            .map(|_| rng.gen_range(low..=config.max_value))
            .collect()
    };

    let present: HashSet<i64> = values.iter().copied().collect();
    let absent_wanted = config.n.min((span - present.len() as u64) as usize);
    let mut seen = HashSet::with_capacity(absent_wanted);
    let mut absent = Vec::with_capacity(absent_wanted);
    while absent.len() < absent_wanted {
        let q = rng.gen_range(low..=config.max_value);
        if !present.contains(&q) && seen.insert(q) {
            absent.push(q);
        }
    }

    let mut queries = values.clone();
    queries.extend(absent);
    queries.shuffle(rng);
    while queries.len() < config.n {
        queries.push(rng.gen_range(low..=config.max_value));
    }
    queries.truncate(config.n);

    let index = RankIndex::new(values.clone());
    let answers = queries.iter().map(|&q| index.rank(q)).collect();
    Ok((Problem::new(values, queries), answers))
}

/// Renders answers in the output format, without a trailing newline.
pub fn answers_to_string(answers: &[Option<usize>]) -> String {
    answers
        .iter()
        .map(|&a| format_answer(a))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the first `count` cases of `plan` as `{prefix}{i}.in` and
/// `{prefix}{i}.ans`, numbered from 1. Returns the input paths written.
///
/// The first case of the plan is the sample and is always written, even when
/// `count` is zero.
pub fn write_cases<R: Rng>(
    dir: &Path,
    prefix: &str,
    plan: &[CaseConfig],
    count: usize,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for (i, config) in plan.iter().take(count.max(1)).enumerate() {
        let case = i + 1;
        let (problem, answers) = generate_case(config, rng)?;

        let input_path = dir.join(format!("{prefix}{case}.in"));
        let answer_path = dir.join(format!("{prefix}{case}.ans"));
        fs::write(&input_path, problem.to_input_string())
            .with_context(|| format!("failed to write {}", input_path.display()))?;
        fs::write(&answer_path, answers_to_string(&answers))
            .with_context(|| format!("failed to write {}", answer_path.display()))?;

        info!(case, m = config.m, n = config.n, max_value = config.max_value, "generated case");
        written.push(input_path);
    }
    Ok(written)
}
