//! Existence guard
//!
//! Wraps an operation so it only runs when the inventory holds a record whose
//! name is exactly (case-sensitively) the requested one. When no such record
//! exists a notice is printed and the wrapped operation is never invoked.

use crate::error::{InventoryError, Result};
use crate::record::Record;
use std::io::Write;
use tracing::info;

/// True when some record's name is exactly `item`.
pub fn contains_item(records: &[Record], item: &str) -> bool {
    records.iter().any(|record| record.item == item)
}

/// Wrap `op` behind an existence check for `item`.
///
/// The guarded operation yields `Ok(Some(_))` with the wrapped result when
/// the item exists and `Ok(None)` when it does not.
pub fn require_item<S, T>(
    item: &str,
    op: impl FnOnce(S, &mut dyn Write) -> Result<T>,
) -> impl FnOnce(S, &mut dyn Write) -> Result<Option<T>>
where
    S: AsRef<[Record]>,
{
    move |state: S, out: &mut dyn Write| {
        if contains_item(state.as_ref(), item) {
            return op(state, out).map(Some);
        }
        info!(item, "item not found; operation skipped");
        writeln!(out, "Item {} not found.", item).map_err(InventoryError::output)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn records() -> Vec<Record> {
        vec![
            Record::new("Milk", "4", "2025-01-10", "1.99"),
            Record::new("eggs", "12", "2025-01-03", "3.50"),
        ]
    }

    #[test]
    fn test_runs_op_when_item_present() {
        let records = records();
        let op = require_item("eggs", |records: &[Record], _out: &mut dyn Write| {
            Ok(records.len())
        });

        let mut buf = Vec::<u8>::new();
        let out: &mut dyn Write = &mut buf;
        assert_eq!(op(records.as_slice(), out).unwrap(), Some(2));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_skips_op_when_item_absent() {
        let records = records();
        let called = Cell::new(false);
        let op = require_item("bread", |_records: &[Record], _out: &mut dyn Write| {
            called.set(true);
            Ok(())
        });

        let mut buf = Vec::<u8>::new();
        let out: &mut dyn Write = &mut buf;
        assert_eq!(op(records.as_slice(), out).unwrap(), None);
        assert!(!called.get());
        assert_eq!(String::from_utf8(buf).unwrap(), "Item bread not found.\n");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let records = records();
        assert!(contains_item(&records, "Milk"));
        assert!(!contains_item(&records, "milk"));
        assert!(!contains_item(&records, "EGGS"));
    }

    #[test]
    fn test_guard_over_mutable_state() {
        let mut records = records();
        let op = require_item("Milk", |records: &mut Vec<Record>, _out: &mut dyn Write| {
            records.clear();
            Ok(())
        });

        let mut buf = Vec::<u8>::new();
        op(&mut records, &mut buf as &mut dyn Write).unwrap();
        assert!(records.is_empty());
    }
}
