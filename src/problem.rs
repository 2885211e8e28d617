use std::io::{Read, Write};

use thiserror::Error;

use crate::rank_index::NOT_FOUND;
use crate::rank_map::RankMap;
use crate::ranker::{BubbleRanker, NaiveRanker, Ranker, Strategy};
use crate::RankIndex;

/// Malformed problem input. Positions are 0-based token indices.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing {what} at token {position}")]
    Missing { what: &'static str, position: usize },

    #[error("expected integer for {what} at token {position}, found {token:?}")]
    NotAnInteger {
        what: &'static str,
        position: usize,
        token: String,
    },

    #[error("query count must not be negative, found {0}")]
    NegativeQueryCount(i64),
}

/// One problem instance: the values to rank and the queries to answer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Problem {
    pub values: Vec<i64>,
    pub queries: Vec<i64>,
}

/// Whitespace token reader that remembers how far it got.
pub(crate) struct Tokens<'a> {
    iter: std::str::SplitAsciiWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Tokens {
            iter: input.split_ascii_whitespace(),
            position: 0,
        }
    }

    pub(crate) fn next_int(&mut self, what: &'static str) -> Result<i64, ParseError> {
        let position = self.position;
        let token = self
            .iter
            .next()
            .ok_or(ParseError::Missing { what, position })?;
        self.position += 1;
        token.parse().map_err(|_| ParseError::NotAnInteger {
            what,
            position,
            token: token.to_string(),
        })
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Counts the tokens that were never consumed.
    pub(crate) fn remaining(self) -> usize {
        self.iter.count()
    }
}

impl Problem {
    pub fn new(values: Vec<i64>, queries: Vec<i64>) -> Self {
        Problem { values, queries }
    }

    /// Parses `m`, `m` values, `n`, `n` queries.
    ///
    /// A non-positive `m` means there are no values and is followed directly
    /// by `n`. Anything after the last query is ignored.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_tokens(&mut Tokens::new(input))
    }

    pub(crate) fn parse_tokens(tokens: &mut Tokens) -> Result<Self, ParseError> {
        let m = tokens.next_int("value count")?;
        let values = (0..m.max(0))
            .map(|_| tokens.next_int("value"))
            .collect::<Result<Vec<_>, _>>()?;

        let n = tokens.next_int("query count")?;
        if n < 0 {
            return Err(ParseError::NegativeQueryCount(n));
        }
        let queries = (0..n)
            .map(|_| tokens.next_int("query"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Problem { values, queries })
    }

    pub fn read_from<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(Self::parse(&input)?)
    }

    /// Renders the problem in the input format: sizes and the value list on
    /// their own lines, one query per line.
    pub fn to_input_string(&self) -> String {
        let mut lines = Vec::with_capacity(self.queries.len() + 3);
        lines.push(self.values.len().to_string());
        lines.push(join(&self.values));
        lines.push(self.queries.len().to_string());
        lines.extend(self.queries.iter().map(|q| q.to_string()));
        lines.join("\n")
    }
}

fn join(xs: &[i64]) -> String {
    xs.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Answers every query of `problem` with the given strategy.
pub fn solve(problem: &Problem, strategy: Strategy) -> Vec<Option<usize>> {
    let values = problem.values.clone();
    match strategy {
        Strategy::Index => RankIndex::build(values).batch_rank(&problem.queries),
        Strategy::Map => RankMap::build(values).batch_rank(&problem.queries),
        Strategy::Naive => NaiveRanker::build(values).batch_rank(&problem.queries),
        Strategy::Bubble => BubbleRanker::build(values).batch_rank(&problem.queries),
    }
}

/// Formats one answer the way the output expects it.
pub fn format_answer(answer: Option<usize>) -> String {
    answer.map_or(NOT_FOUND.to_string(), |r| r.to_string())
}

/// Writes one line per answer, `-1` for missing values.
pub fn write_answers<W: Write>(mut writer: W, answers: &[Option<usize>]) -> std::io::Result<()> {
    for &answer in answers {
        writeln!(writer, "{}", format_answer(answer))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let problem = Problem::parse("4\n5 3 3 1\n5\n5\n3\n1\n2\n3\n").unwrap();
        assert_eq!(problem.values, vec![5, 3, 3, 1]);
        assert_eq!(problem.queries, vec![5, 3, 1, 2, 3]);
    }

    #[test]
    fn parse_ignores_line_structure() {
        let problem = Problem::parse("  2 -7\t8 3 1 2 3").unwrap();
        assert_eq!(problem, Problem::new(vec![-7, 8], vec![1, 2, 3]));
    }

    #[test]
    fn parse_non_positive_m_has_no_values() {
        let problem = Problem::parse("0\n2\n4\n5").unwrap();
        assert!(problem.values.is_empty());
        assert_eq!(problem.queries, vec![4, 5]);

        let problem = Problem::parse("-3 1 9").unwrap();
        assert!(problem.values.is_empty());
        assert_eq!(problem.queries, vec![9]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Problem::parse(""),
            Err(ParseError::Missing {
                what: "value count",
                position: 0
            })
        );
        assert_eq!(
            Problem::parse("2 1"),
            Err(ParseError::Missing {
                what: "value",
                position: 2
            })
        );
        assert_eq!(
            Problem::parse("1 x 1 1"),
            Err(ParseError::NotAnInteger {
                what: "value",
                position: 1,
                token: "x".to_string()
            })
        );
        assert_eq!(
            Problem::parse("1 4 -1"),
            Err(ParseError::NegativeQueryCount(-1))
        );
        assert!(Problem::parse("1 4 2 4").is_err());
    }

    #[test]
    fn input_string_parses_back() {
        let problem = Problem::new(vec![3, -1, 3], vec![3, 0]);
        assert_eq!(Problem::parse(&problem.to_input_string()).unwrap(), problem);
    }

    #[test]
    fn solve_every_strategy() {
        let problem = Problem::new(vec![5, 3, 3, 1], vec![5, 3, 1, 2, 3]);
        for strategy in Strategy::ALL {
            assert_eq!(
                solve(&problem, strategy),
                vec![Some(1), Some(2), Some(4), None, Some(2)],
                "{strategy}"
            );
        }
    }

    #[test]
    fn solve_without_values() {
        let problem = Problem::parse("0 3 1 -1 0").unwrap();
        assert_eq!(solve(&problem, Strategy::Index), vec![None; 3]);
    }

    #[test]
    fn answers_are_lines() {
        let mut out = Vec::new();
        write_answers(&mut out, &[Some(1), None, Some(12)]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\n-1\n12\n");
    }
}
