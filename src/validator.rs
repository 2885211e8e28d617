use thiserror::Error;

use crate::problem::{ParseError, Problem, Tokens};

/// Bounds an input must respect to be accepted as test data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_len: usize,
    pub max_queries: usize,
    pub max_abs_value: i64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_len: 100_000,
            max_queries: 100_000,
            max_abs_value: i32::MAX as i64,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{count} unexpected tokens after token {position}")]
    TrailingTokens { position: usize, count: usize },

    #[error("{what} {count} is out of range 0..={max}")]
    CountOutOfRange {
        what: &'static str,
        count: i64,
        max: usize,
    },

    #[error("{what} {value} at index {index} exceeds magnitude {max}")]
    ValueOutOfRange {
        what: &'static str,
        index: usize,
        value: i64,
        max: i64,
    },
}

/// Checks `input` is exactly one well-formed problem within `limits`.
pub fn validate(input: &str, limits: &Limits) -> Result<Problem, ValidationError> {
    let mut tokens = Tokens::new(input);
    let problem = Problem::parse_tokens(&mut tokens)?;

    let position = tokens.position();
    let count = tokens.remaining();
    if count > 0 {
        return Err(ValidationError::TrailingTokens { position, count });
    }

    check_count("value count", problem.values.len(), limits.max_len)?;
    check_count("query count", problem.queries.len(), limits.max_queries)?;
    check_values("value", &problem.values, limits.max_abs_value)?;
    check_values("query", &problem.queries, limits.max_abs_value)?;

    Ok(problem)
}

fn check_count(what: &'static str, count: usize, max: usize) -> Result<(), ValidationError> {
    if count > max {
        return Err(ValidationError::CountOutOfRange {
            what,
            count: count as i64,
            max,
        });
    }
    Ok(())
}

fn check_values(what: &'static str, xs: &[i64], max: i64) -> Result<(), ValidationError> {
    match xs.iter().position(|x| x.unsigned_abs() > max.unsigned_abs()) {
        Some(index) => Err(ValidationError::ValueOutOfRange {
            what,
            index,
            value: xs[index],
            max,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed() {
        let problem = validate("3\n1 2 3\n2\n1\n4\n", &Limits::default()).unwrap();
        assert_eq!(problem.values, vec![1, 2, 3]);
        assert_eq!(problem.queries, vec![1, 4]);
    }

    #[test]
    fn accepts_no_values() {
        assert!(validate("0\n1\n5", &Limits::default()).is_ok());
    }

    #[test]
    fn rejects_trailing() {
        assert_eq!(
            validate("1 1 1 1 9 9", &Limits::default()),
            Err(ValidationError::TrailingTokens {
                position: 4,
                count: 2
            })
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(
            validate("2 1", &Limits::default()),
            Err(ValidationError::Parse(ParseError::Missing { .. }))
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        let limits = Limits {
            max_len: 2,
            max_queries: 1,
            max_abs_value: 10,
        };
        assert!(matches!(
            validate("3 1 2 3 0", &limits),
            Err(ValidationError::CountOutOfRange { .. })
        ));
        assert!(matches!(
            validate("1 1 2 1 1", &limits),
            Err(ValidationError::CountOutOfRange { what: "query count", .. })
        ));
        assert_eq!(
            validate("2 4 -11 1 1", &limits),
            Err(ValidationError::ValueOutOfRange {
                what: "value",
                index: 1,
                value: -11,
                max: 10
            })
        );
        assert!(validate("1 4 1 11", &limits).is_err());
    }

    #[test]
    fn default_limits_allow_i32_extremes() {
        let input = format!("2 {} {} 0", i32::MAX, i32::MIN + 1);
        assert!(validate(&input, &Limits::default()).is_ok());
        let input = format!("1 {} 0", i32::MAX as i64 + 1);
        assert!(validate(&input, &Limits::default()).is_err());
    }
}
