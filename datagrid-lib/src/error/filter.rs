//! Filter error types

use chrono::NaiveDate;

/// Errors for filter values entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A date string was not in `YYYY-MM-DD` form.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// The start of a date range lies after its end.
    #[error("date range starts after it ends ({from} > {to})")]
    InvertedRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },
}

impl FilterError {
    /// Creates an invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }
}
