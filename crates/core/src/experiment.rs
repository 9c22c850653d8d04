//! Experiment numbering.

use crate::error::CoreError;

/// Parse an experiment number taken from a URL path segment.
///
/// Only plain positive decimal integers are accepted.
pub fn parse_experiment_no(raw: &str) -> Result<i32, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match trimmed.parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid()),
    }
}

fn invalid() -> CoreError {
    CoreError::Validation("Invalid experiment number".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_experiment_no("1").unwrap(), 1);
        assert_eq!(parse_experiment_no(" 12 ").unwrap(), 12);
    }

    #[test]
    fn rejects_everything_else() {
        for raw in ["", "abc", "0", "-3", "+3", "1.5", "99999999999", "4 OR 1=1"] {
            assert!(parse_experiment_no(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
