// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::models::Priority;
use crate::stages::Outcome;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit if an operation did not go through.
/// Backend failures were already shown as a notice; validation rejections were not.
pub fn exit_on_failure(outcome: &Outcome) {
    if !outcome.is_failure() {
        return;
    }
    match outcome {
        Outcome::Rejected(err) => user_error(&err.to_string()),
        _ => process::exit(1),
    }
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Parse a priority argument
pub fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_str(value).ok_or_else(|| {
        format!("Invalid priority: '{}'. Use high, medium or low.", value)
    })
}

/// Validate a progress percentage (0-100)
pub fn validate_progress(value: u8) -> Result<u8, String> {
    if value <= 100 {
        Ok(value)
    } else {
        Err(format!("Invalid progress: {}. Progress must be between 0 and 100.", value))
    }
}

/// Validate that an order position is positive
pub fn validate_order(value: u32) -> Result<u32, String> {
    if value > 0 {
        Ok(value)
    } else {
        Err("Invalid order: 0. Order must be a positive number.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("p1", "Project").is_ok());
        assert!(validate_non_empty("", "Project").is_err());
        assert!(validate_non_empty("   ", "Project").is_err());
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("high"), Ok(Priority::High));
        assert_eq!(parse_priority("BAS"), Ok(Priority::Low));
        assert!(parse_priority("asap").is_err());
    }

    #[test]
    fn test_validate_progress() {
        assert_eq!(validate_progress(0), Ok(0));
        assert_eq!(validate_progress(100), Ok(100));
        assert!(validate_progress(101).is_err());
    }

    #[test]
    fn test_exit_on_failure_ignores_settled_outcomes() {
        for outcome in [Outcome::Applied, Outcome::NoOp, Outcome::Unavailable, Outcome::Busy] {
            assert!(!outcome.is_failure());
            exit_on_failure(&outcome);
        }
        assert!(Outcome::Failed.is_failure());
        assert!(Outcome::Rejected(crate::models::ValidationError::InvalidOrder(0)).is_failure());
    }

    #[test]
    fn test_validate_order() {
        assert_eq!(validate_order(3), Ok(3));
        assert!(validate_order(0).is_err());
    }
}
