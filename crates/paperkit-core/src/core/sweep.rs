use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SweepError {
    #[error("Step must be positive, got {0}")]
    InvalidStep(f64),
    #[error("Range end {end} lies below its start {start}")]
    InvertedRange { start: f64, end: f64 },
    #[error("Cannot parse '{0}' as a list of particle counts")]
    InvalidCountList(String),
}

/// `start, start + step, …` up to and including `end`. An end that is a whole
/// number of steps away up to rounding is included, and nothing beyond it.
pub fn inclusive_range(start: f64, end: f64, step: f64) -> Result<Vec<f64>, SweepError> {
    if !(step > 0.0) {
        return Err(SweepError::InvalidStep(step));
    }
    if end < start {
        return Err(SweepError::InvertedRange { start, end });
    }
    let count = ((end - start) / step + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// A swept parameter given either point by point or as a stepped range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    List(Vec<f64>),
    Range { start: f64, end: f64, step: f64 },
}

impl ValueSpec {
    pub fn values(&self) -> Result<Vec<f64>, SweepError> {
        match self {
            ValueSpec::List(values) => Ok(values.clone()),
            ValueSpec::Range { start, end, step } => inclusive_range(*start, *end, *step),
        }
    }
}

/// Parses particle-count lists written as `2..10`, `range(2, 10)`,
/// `range(2, 10, 2)`, `2,3,5` or `[2, 3, 5]`. Ranges exclude their end.
pub fn parse_count_list(text: &str) -> Result<Vec<u32>, SweepError> {
    let invalid = || SweepError::InvalidCountList(text.to_string());
    let trimmed = text.trim();
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|_| invalid());

    if let Some((lo, hi)) = trimmed.split_once("..") {
        return Ok((parse(lo)?..parse(hi)?).collect());
    }

    if let Some(inner) = trimmed
        .strip_prefix("range(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let bounds = inner.split(',').map(parse).collect::<Result<Vec<u32>, _>>()?;
        return match bounds.as_slice() {
            [hi] => Ok((0..*hi).collect()),
            [lo, hi] => Ok((*lo..*hi).collect()),
            [lo, hi, step] if *step > 0 => Ok((*lo..*hi).step_by(*step as usize).collect()),
            _ => Err(invalid()),
        };
    }

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Err(invalid());
    }
    inner.split(',').map(parse).collect()
}

/// Renders counts the way a Python list literal prints: `[2, 3, 4]`.
pub fn python_list(values: &[u32]) -> String {
    format!("[{}]", values.iter().join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_range_includes_end() {
        assert_eq!(inclusive_range(1.0, 3.0, 1.0).unwrap(), vec![1.0, 2.0, 3.0]);
        let densities = inclusive_range(0.8, 1.0, 0.1).unwrap();
        assert_eq!(densities.len(), 3);
        assert!((densities[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inclusive_range_rejects_bad_steps() {
        assert_eq!(
            inclusive_range(0.0, 1.0, 0.0),
            Err(SweepError::InvalidStep(0.0))
        );
        assert!(matches!(
            inclusive_range(2.0, 1.0, 0.5),
            Err(SweepError::InvertedRange { .. })
        ));
    }

    #[test]
    fn value_spec_resolves_both_forms() {
        assert_eq!(ValueSpec::List(vec![2.0]).values().unwrap(), vec![2.0]);
        let range = ValueSpec::Range {
            start: 0.0,
            end: 1.0,
            step: 0.5,
        };
        assert_eq!(range.values().unwrap(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn count_lists_accept_common_spellings() {
        assert_eq!(parse_count_list("2..5").unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_count_list("range(2,5)").unwrap(), vec![2, 3, 4]);
        assert_eq!(parse_count_list("range(2, 9, 3)").unwrap(), vec![2, 5, 8]);
        assert_eq!(parse_count_list("2,3,5").unwrap(), vec![2, 3, 5]);
        assert_eq!(parse_count_list("[2, 3]").unwrap(), vec![2, 3]);
        assert_eq!(parse_count_list("7").unwrap(), vec![7]);
    }

    #[test]
    fn count_lists_reject_garbage() {
        assert!(parse_count_list("").is_err());
        assert!(parse_count_list("two").is_err());
        assert!(parse_count_list("range(1,2,0)").is_err());
    }

    #[test]
    fn python_list_matches_list_literal() {
        assert_eq!(python_list(&[2, 3, 4]), "[2, 3, 4]");
        assert_eq!(python_list(&[]), "[]");
    }
}
