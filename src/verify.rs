// SPDX-License-Identifier: MIT

use crate::error::{HarnessError, Result};

/// Checks a strategy's total against the reference total.
///
/// A mismatch means a partitioning or synchronisation defect. It is reported
/// immediately and never retried.
pub fn verify_total(
    strategy: &'static str,
    actual: u64,
    expected: u64,
) -> Result<u64> {
    if actual != expected {
        tracing::error!(strategy, expected, actual, "correctness violation");
        return Err(HarnessError::CorrectnessViolation {
            strategy,
            expected,
            actual,
        });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_passes_through() {
        assert_eq!(verify_total("sequential", 15, 15).unwrap(), 15);
    }

    #[test]
    fn test_mismatch_is_violation() {
        let err = verify_total("shared_array", 14, 15).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::CorrectnessViolation {
                strategy: "shared_array",
                expected: 15,
                actual: 14,
            }
        ));
        assert_eq!(
            err.to_string(),
            "shared_array: computed total 14 differs from reference total 15"
        );
    }
}
