use chrono::NaiveDate;
use thiserror::Error;

/// Client-side rejection of a form, raised before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("progress must be between 0 and 100, got {0}")]
    ProgressOutOfRange(u8),
    #[error("order must be a positive number, got {0}")]
    InvalidOrder(u32),
    #[error("start date {start} is after end date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
    #[error("project identifier cannot be empty")]
    EmptyProjectId,
}

/// Optional validation rules enabled through configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationRules {
    /// Reject stages whose start date falls after their end date
    pub require_date_order: bool,
}

impl ValidationRules {
    pub fn check_dates(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        match (start, end) {
            (Some(start), Some(end)) if self.require_date_order && start > end => {
                Err(ValidationError::DateOrder { start, end })
            }
            _ => Ok(()),
        }
    }
}
