use crate::error::ValidationError;
use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifies a record. Ids are minted from the creation time in milliseconds and never change.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A single income or expense entry.
///
/// The serialized form is `{id, description, amount, date, category}` where `date` and `category`
/// are omitted when absent.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    description: String,
    amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl Record {
    /// Builds a record from already validated fields.
    pub(crate) fn new(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            description: fields.description,
            amount: fields.amount,
            date: fields.date,
            category: fields.category,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The editable fields of this record, everything except the id.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            description: self.description.clone(),
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
        }
    }

    /// Replaces every field except the id.
    pub(crate) fn replace(&mut self, fields: RecordFields) {
        self.description = fields.description;
        self.amount = fields.amount;
        self.date = fields.date;
        self.category = fields.category;
    }
}

/// The user-editable fields of a record. This is what an edit form holds.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RecordFields {
    pub description: String,
    pub amount: Amount,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl RecordFields {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<Amount>,
        date: Option<NaiveDate>,
        category: Option<&str>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            date,
            category: category.map(str::to_string),
        }
    }

    /// Parses raw form input. Empty `date` or `category` text means "none".
    pub fn parse(
        description: &str,
        amount: &str,
        date: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let amount = Amount::from_str(amount)?;
        let date = date.map(parse_date).transpose()?.flatten();
        Ok(Self {
            description: description.to_string(),
            amount,
            date,
            category: category.map(str::to_string),
        })
    }

    /// Trims the description and category and rejects an empty description. A blank category
    /// becomes `None`.
    pub(crate) fn normalize(self) -> Result<Self, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self {
            description: description.to_string(),
            amount: self.amount,
            date: self.date,
            category: normalize_category(self.category.as_deref()),
        })
    }
}

/// Returns the trimmed category, or `None` if it is missing or blank.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Parses a `YYYY-MM-DD` date. Blank input is `Ok(None)`.
pub fn parse_date(s: &str) -> Result<Option<NaiveDate>, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_trims() {
        let fields = RecordFields::new("  Lunch ", -15, None, Some("  Food  "))
            .normalize()
            .unwrap();
        assert_eq!(fields.description, "Lunch");
        assert_eq!(fields.category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_normalize_blank_category() {
        let fields = RecordFields::new("Lunch", -15, None, Some("   "))
            .normalize()
            .unwrap();
        assert!(fields.category.is_none());
    }

    #[test]
    fn test_normalize_empty_description() {
        let err = RecordFields::new(" \t ", -15, None, None)
            .normalize()
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyDescription);
    }

    #[test]
    fn test_parse_form_input() {
        let fields = RecordFields::parse("Lunch", "-15", Some("2026-02-09"), Some("Food")).unwrap();
        assert_eq!(fields.amount, Amount::from(-15));
        assert_eq!(fields.date, Some(date(2026, 2, 9)));

        let fields = RecordFields::parse("Lunch", "-15", Some(""), None).unwrap();
        assert!(fields.date.is_none());
    }

    #[test]
    fn test_parse_form_input_errors() {
        assert_eq!(
            RecordFields::parse("Lunch", "abc", None, None).unwrap_err(),
            ValidationError::InvalidAmount("abc".to_string())
        );
        assert_eq!(
            RecordFields::parse("Lunch", "1", Some("2026-13-01"), None).unwrap_err(),
            ValidationError::InvalidDate("2026-13-01".to_string())
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = Record::new(
            RecordId::new(1770600000000),
            RecordFields::new("Lunch", -15, Some(date(2026, 2, 9)), Some("Food")),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1770600000000_i64,
                "description": "Lunch",
                "amount": "-15",
                "date": "2026-02-09",
                "category": "Food"
            })
        );
    }

    #[test]
    fn test_record_json_without_optionals() {
        let json = r#"{"id": 7, "description": "Gift", "amount": 20}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), RecordId::new(7));
        assert!(record.date().is_none());
        assert!(record.category().is_none());
        assert!(!serde_json::to_string(&record).unwrap().contains("category"));
    }

    #[test]
    fn test_record_id_from_str() {
        assert_eq!(RecordId::from_str(" 42 ").unwrap(), RecordId::new(42));
        assert!(RecordId::from_str("abc").is_err());
    }
}
