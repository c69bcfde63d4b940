//! Totals and the category index, always computed over the full record set.

use crate::model::{normalize_category, Amount, Record};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeSet;

/// Running totals over every record, independent of any active filter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of every amount.
    pub balance: Amount,
    /// Sum of the positive amounts.
    pub income: Amount,
    /// Sum of the negative amounts. This stays negative.
    pub expense: Amount,
    /// The number of records.
    pub count: usize,
}

/// Totals the records. Zero amounts count towards `count` but neither `income` nor `expense`.
///
/// # Errors
/// Returns `Error::TotalOverflow` if any total does not fit in a decimal.
pub fn summarize(records: &[Record]) -> Result<Summary> {
    let amounts = || records.iter().map(Record::amount);
    Ok(Summary {
        balance: total(amounts())?,
        income: total(amounts().filter(Amount::is_positive))?,
        expense: total(amounts().filter(Amount::is_negative))?,
        count: records.len(),
    })
}

fn total(amounts: impl Iterator<Item = Amount>) -> Result<Amount> {
    Amount::checked_sum(amounts).ok_or(Error::TotalOverflow)
}

/// The options for a category selector.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    /// Distinct, trimmed, non-empty categories in lexicographic order.
    pub names: Vec<String>,
    /// Whether any record has no category, i.e. whether an "uncategorized" option is useful.
    pub has_uncategorized: bool,
}

impl CategoryIndex {
    /// Rebuild after every mutation of the record set.
    pub fn from_records(records: &[Record]) -> Self {
        let mut names = BTreeSet::new();
        let mut has_uncategorized = false;
        for record in records {
            match normalize_category(record.category()) {
                Some(name) => {
                    let _ = names.insert(name);
                }
                None => has_uncategorized = true,
            }
        }
        Self {
            names: names.into_iter().collect(),
            has_uncategorized,
        }
    }
}
