//! Error types for the record store, edit session and persistence layer.

use crate::model::RecordId;
use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Error>;

/// The errors that the core operations can return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input was rejected before any operation was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An update or delete referenced a record that is no longer in the store. Callers should
    /// refresh whatever view they are showing.
    #[error("no record exists with id {0}")]
    NotFound(RecordId),

    /// Saving the record set failed. The in-memory record set still holds the change.
    #[error("changes may not persist: {0:#}")]
    Persistence(anyhow::Error),

    /// The totals of the stored amounts do not fit in a decimal.
    #[error("the total of the stored amounts is too large to compute")]
    TotalOverflow,

    /// A stored record already holds the largest possible id, so no newer id can be minted.
    #[error("no record id is available after {0}")]
    IdsExhausted(RecordId),
}

/// Problems with user input that are reported before the store or the view is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("a custom date range needs both a start date and an end date")]
    MissingDateBound,

    #[error("start date {from} must be before end date {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
}

impl Error {
    /// Returns true if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns the validation problem if this is a `Validation` error.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(v) => Some(v),
            _ => None,
        }
    }
}
