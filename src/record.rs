//! Inventory records
//!
//! A record is a verbatim transcript of one CSV row. Quantity and price are
//! kept as text; only the expiration date is ever interpreted, and only when
//! a report needs to order or filter by it.

use crate::error::{ErrorCategory, ErrorKind, InventoryError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Format of the `expiration_date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One inventory line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub item: String,
    pub quantity: String,
    pub expiration_date: String,
    pub price: String,
}

impl Record {
    pub fn new(
        item: impl Into<String>,
        quantity: impl Into<String>,
        expiration_date: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            quantity: quantity.into(),
            expiration_date: expiration_date.into(),
            price: price.into(),
        }
    }

    /// Parse the expiration date.
    pub fn expiration(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&self.expiration_date, DATE_FORMAT).map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::DateParse,
                format!(
                    "item {:?} has invalid expiration date {:?} (expected YYYY-MM-DD)",
                    self.item, self.expiration_date
                ),
                e,
            )
        })
    }
}

/// Replacement values for an update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub quantity: Option<String>,
    pub expiration_date: Option<String>,
    pub price: Option<String>,
}

impl ItemUpdate {
    /// Build an update from raw prompt answers, where a blank answer means
    /// "keep the current value".
    pub fn from_inputs(quantity: &str, expiration_date: &str, price: &str) -> Self {
        Self {
            quantity: non_blank(quantity),
            expiration_date: non_blank(expiration_date),
            price: non_blank(price),
        }
    }

    pub(crate) fn apply(&self, record: &mut Record) {
        if let Some(quantity) = &self.quantity {
            record.quantity.clone_from(quantity);
        }
        if let Some(expiration_date) = &self.expiration_date {
            record.expiration_date.clone_from(expiration_date);
        }
        if let Some(price) = &self.price {
            record.price.clone_from(price);
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Return copies of `records` ordered by ascending expiration date.
///
/// The sort is stable, so records sharing a date keep their relative order.
/// Every date is parsed up front; one malformed date fails the whole call.
pub fn sort_by_expiration<'a, I>(records: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut keyed = records
        .into_iter()
        .map(|record| -> Result<(NaiveDate, Record)> {
            Ok((record.expiration()?, record.clone()))
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by_key(|(date, _)| *date);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_parses_iso_date() {
        let record = Record::new("milk", "4", "2024-02-29", "1.99");
        assert_eq!(
            record.expiration().unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_expiration_rejects_garbage() {
        let record = Record::new("milk", "4", "not-a-date", "1.99");
        let err = record.expiration().unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::DateParse));
        assert_eq!(err.category, ErrorCategory::User);
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_expiration_rejects_impossible_day() {
        let record = Record::new("milk", "4", "2023-02-30", "1.99");
        assert!(record.expiration().is_err());
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let records = vec![
            Record::new("c", "1", "2025-03-01", "1"),
            Record::new("a", "1", "2025-01-01", "1"),
            Record::new("b", "1", "2025-03-01", "1"),
            Record::new("d", "1", "2025-01-01", "1"),
        ];
        let sorted = sort_by_expiration(&records).unwrap();
        let names: Vec<&str> = sorted.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(names, vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_sort_fails_on_unparseable_date() {
        let records = vec![
            Record::new("a", "1", "2025-01-01", "1"),
            Record::new("b", "1", "not-a-date", "1"),
        ];
        let err = sort_by_expiration(&records).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::DateParse));
    }

    #[test]
    fn test_update_from_blank_inputs_is_empty() {
        let update = ItemUpdate::from_inputs("", "", "");
        assert_eq!(update, ItemUpdate::default());

        let mut record = Record::new("milk", "4", "2025-01-01", "1.99");
        update.apply(&mut record);
        assert_eq!(record, Record::new("milk", "4", "2025-01-01", "1.99"));
    }

    #[test]
    fn test_update_applies_only_supplied_fields() {
        let update = ItemUpdate::from_inputs("", "", "2.49");
        let mut record = Record::new("milk", "4", "2025-01-01", "1.99");
        update.apply(&mut record);
        assert_eq!(record, Record::new("milk", "4", "2025-01-01", "2.49"));
    }
}
