//! The filter-sort engine: turns the full record set and the user's criteria into the ordered list
//! of records to display.

use crate::error::ValidationError;
use crate::model::Record;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::trace;

/// The six display orders.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateAsc,
    /// Newest first.
    #[default]
    DateDesc,
    /// Smallest magnitude first, regardless of sign.
    AmountAsc,
    /// Largest magnitude first, regardless of sign.
    AmountDesc,
    /// A to Z, ignoring case. Letters compare by their lowercase code points, not by locale
    /// collation, so accented letters sort after `z`.
    NameAsc,
    /// Z to A, ignoring case, with the same code-point comparison as `NameAsc`.
    NameDesc,
}

serde_plain::derive_display_from_serialize!(SortKey);
serde_plain::derive_fromstr_from_deserialize!(SortKey);

impl SortKey {
    /// Compares two records for this order. Ties are broken by id so the order is total and
    /// repeated views are identical.
    pub fn compare(self, a: &Record, b: &Record) -> Ordering {
        let primary = match self {
            SortKey::DateAsc => date_key(a).cmp(&date_key(b)),
            SortKey::DateDesc => date_key(b).cmp(&date_key(a)),
            SortKey::AmountAsc => a.amount().magnitude().cmp(&b.amount().magnitude()),
            SortKey::AmountDesc => b.amount().magnitude().cmp(&a.amount().magnitude()),
            SortKey::NameAsc => name_key(a).cmp(&name_key(b)),
            SortKey::NameDesc => name_key(b).cmp(&name_key(a)),
        };
        primary.then_with(|| a.id().cmp(&b.id()))
    }
}

/// Undated records sort as if dated at the Unix epoch.
fn date_key(record: &Record) -> NaiveDate {
    record.date().unwrap_or_else(epoch)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Case-insensitive name ordering. Descriptions that differ only in case fall back to their
/// exact text.
fn name_key(record: &Record) -> (String, &str) {
    (record.description().to_lowercase(), record.description())
}

/// Which categories are visible.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Only records without a category. A blank category counts as none.
    Uncategorized,
    /// Only records whose category is exactly this text (case-sensitive). Surrounding whitespace
    /// is ignored on both sides.
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Uncategorized => {
                record.category().map_or(true, |c| c.trim().is_empty())
            }
            CategoryFilter::Named(name) => record.category().map(str::trim) == Some(name.trim()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    /// `all` and `uncategorized` are the selector keywords; anything else is a category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => CategoryFilter::All,
            "uncategorized" => CategoryFilter::Uncategorized,
            name => CategoryFilter::Named(name.to_string()),
        })
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Uncategorized => f.write_str("uncategorized"),
            CategoryFilter::Named(name) => f.write_str(name),
        }
    }
}

/// Which dates are visible. Every selector except `All` hides undated records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFilter {
    #[default]
    All,
    Today,
    /// The Sunday-to-Saturday week containing today.
    Week,
    /// The calendar month containing today.
    Month,
    /// An inclusive range. A missing bound, or `from` after `to`, matches nothing.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

/// The set of days a `DateFilter` admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Everything,
    Nothing,
    Between(NaiveDate, NaiveDate),
}

impl Window {
    fn contains(self, date: Option<NaiveDate>) -> bool {
        match (self, date) {
            (Window::Everything, _) => true,
            (Window::Between(start, end), Some(d)) => start <= d && d <= end,
            _ => false,
        }
    }
}

impl DateFilter {
    /// Checks that a custom range is complete and not inverted. Other selectors are always valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            DateFilter::Custom { from, to } => match (from, to) {
                (Some(from), Some(to)) if from > to => {
                    Err(ValidationError::InvertedDateRange { from, to })
                }
                (Some(_), Some(_)) => Ok(()),
                _ => Err(ValidationError::MissingDateBound),
            },
            _ => Ok(()),
        }
    }

    /// The inclusive first and last day admitted relative to `today`, or `None` when the filter
    /// admits every record (`All`) or no record (a bad custom range).
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self.window(today) {
            Window::Between(start, end) => Some((start, end)),
            _ => None,
        }
    }

    fn window(&self, today: NaiveDate) -> Window {
        match *self {
            DateFilter::All => Window::Everything,
            DateFilter::Today => Window::Between(today, today),
            DateFilter::Week => {
                let back = Days::new(u64::from(today.weekday().num_days_from_sunday()));
                let start = today.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
                Window::Between(start, end)
            }
            DateFilter::Month => {
                let start = today.with_day(1).unwrap_or(today);
                let end = start
                    .checked_add_months(chrono::Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                Window::Between(start, end)
            }
            DateFilter::Custom {
                from: Some(from),
                to: Some(to),
            } if from <= to => Window::Between(from, to),
            DateFilter::Custom { .. } => Window::Nothing,
        }
    }
}

/// Everything that decides which records are visible and in which order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Criteria {
    /// Matched case-insensitively against description and category. Blank means no filter.
    pub search: String,
    pub category: CategoryFilter,
    pub date: DateFilter,
    pub sort: SortKey,
}

impl Criteria {
    /// Puts every filter and the sort order back to their defaults.
    pub fn reset(&mut self) {
        *self = Criteria::default();
    }

    /// Rejects an incomplete or inverted custom date range. Callers should show the error and not
    /// compute a view.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.date.validate()
    }

    fn matches_search(&self, needle: &str, record: &Record) -> bool {
        if needle.is_empty() {
            return true;
        }
        record.description().to_lowercase().contains(needle)
            || record
                .category()
                .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// Returns copies of the records that pass every filter in `criteria`, ordered by its sort key.
/// `today` anchors the `Today`, `Week` and `Month` date filters.
///
/// The filters are independent and all must pass. An incomplete or inverted custom date range
/// yields an empty view; use `Criteria::validate` first to report it to the user.
pub fn view(records: &[Record], criteria: &Criteria, today: NaiveDate) -> Vec<Record> {
    let needle = criteria.search.trim().to_lowercase();
    let window = criteria.date.window(today);

    let mut visible: Vec<Record> = records
        .iter()
        .filter(|r| criteria.matches_search(&needle, r))
        .filter(|r| criteria.category.matches(r))
        .filter(|r| window.contains(r.date()))
        .cloned()
        .collect();
    visible.sort_by(|a, b| criteria.sort.compare(a, b));

    trace!(
        "View shows {} of {} records sorted by {}",
        visible.len(),
        records.len(),
        criteria.sort
    );
    visible
}
