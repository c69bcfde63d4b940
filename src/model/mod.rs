//! Types that represent the core data model: `Record` and its `Amount`.
mod amount;
mod record;

pub use amount::Amount;
pub use record::{normalize_category, parse_date, Record, RecordFields, RecordId};
