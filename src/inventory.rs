//! Inventory operations
//!
//! The business logic behind every menu entry. Each operation is assembled
//! from a plain body plus the cross-cutting wrappers in [`crate::progress`]
//! and [`crate::guard`]. The wrapper order differs between operations and is
//! observable:
//!
//! - `remove_item` and `update_item` draw the progress bar first and then
//!   check for the item, so the bar shows even when the item is missing.
//! - `search_item` checks for the item first, so the bar only shows when
//!   there is something to search.
//!
//! Mutating operations persist the full record set right after mutating it;
//! read-only operations never touch the file.

use crate::error::{InventoryError, Result};
use crate::guard::require_item;
use crate::progress::{ProgressBar, with_progress};
use crate::record::{ItemUpdate, Record, sort_by_expiration};
use crate::store::RecordStore;
use chrono::{Local, NaiveDate};
use std::io::Write;
use tracing::info;

const RULE_WIDTH: usize = 60;

/// The in-memory inventory for one session, bound to its backing file.
#[derive(Debug)]
pub struct Inventory {
    records: Vec<Record>,
    store: RecordStore,
    progress: ProgressBar,
}

impl Inventory {
    /// Load the inventory from `store`.
    pub fn open(store: RecordStore, progress: ProgressBar) -> Result<Self> {
        let records = store.load()?;
        Ok(Self {
            records,
            store,
            progress,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Append a record and persist. No deduplication or field validation.
    pub fn add_item(&mut self, out: &mut dyn Write, record: Record) -> Result<()> {
        let store = &self.store;
        let op = with_progress(
            self.progress,
            |records: &mut Vec<Record>, _out: &mut dyn Write| {
                info!(item = %record.item, "adding item");
                records.push(record);
                store.save(records)
            },
        );
        op(&mut self.records, out)
    }

    /// Remove every record whose name matches `item` ignoring case, and
    /// persist. Returns the number of removed records, or `None` when no
    /// record is named exactly `item`.
    pub fn remove_item(&mut self, out: &mut dyn Write, item: &str) -> Result<Option<usize>> {
        let store = &self.store;
        let op = with_progress(
            self.progress,
            require_item(item, |records: &mut Vec<Record>, _out: &mut dyn Write| {
                let wanted = item.to_lowercase();
                let before = records.len();
                records.retain(|record| record.item.to_lowercase() != wanted);
                let removed = before - records.len();
                info!(item, removed, "removed item");
                store.save(records)?;
                Ok(removed)
            }),
        );
        op(&mut self.records, out)
    }

    /// Overwrite the supplied fields of every record named exactly `item`,
    /// and persist. Returns the number of updated records, or `None` when
    /// no such record exists.
    pub fn update_item(
        &mut self,
        out: &mut dyn Write,
        item: &str,
        update: &ItemUpdate,
    ) -> Result<Option<usize>> {
        let store = &self.store;
        let op = with_progress(
            self.progress,
            require_item(item, |records: &mut Vec<Record>, _out: &mut dyn Write| {
                let mut updated = 0;
                for record in records.iter_mut().filter(|record| record.item == item) {
                    update.apply(record);
                    updated += 1;
                }
                info!(item, updated, "updated item");
                store.save(records)?;
                Ok(updated)
            }),
        );
        op(&mut self.records, out)
    }

    /// Print every record whose name matches `item` ignoring case.
    ///
    /// Returns the matches, or `None` when no record is named exactly `item`.
    pub fn search_item(&self, out: &mut dyn Write, item: &str) -> Result<Option<Vec<Record>>> {
        let op = require_item(
            item,
            with_progress(self.progress, |records: &[Record], out: &mut dyn Write| {
                let wanted = item.to_lowercase();
                let found: Vec<Record> = records
                    .iter()
                    .filter(|record| record.item.to_lowercase() == wanted)
                    .cloned()
                    .collect();
                write_search_results(out, item, &found).map_err(InventoryError::output)?;
                Ok(found)
            }),
        );
        op(self.records.as_slice(), out)
    }

    /// Print every record ordered by expiration date.
    ///
    /// Returns `None` for an empty inventory. Fails if any expiration date
    /// does not parse.
    pub fn full_report(&self, out: &mut dyn Write) -> Result<Option<Vec<Record>>> {
        let op = with_progress(self.progress, |records: &[Record], out: &mut dyn Write| {
            if records.is_empty() {
                writeln!(out, "No items in the inventory.").map_err(InventoryError::output)?;
                return Ok(None);
            }
            let sorted = sort_by_expiration(records)?;
            write_full_report(out, &sorted).map_err(InventoryError::output)?;
            Ok(Some(sorted))
        });
        op(self.records.as_slice(), out)
    }

    /// Print and return the records that expired before today's local date.
    pub fn expired_items(&self, out: &mut dyn Write) -> Result<Vec<Record>> {
        self.expired_items_as_of(out, Local::now().date_naive())
    }

    /// Print and return the records whose expiration date is strictly before
    /// `today`, ordered by expiration date.
    pub fn expired_items_as_of(
        &self,
        out: &mut dyn Write,
        today: NaiveDate,
    ) -> Result<Vec<Record>> {
        let op = with_progress(self.progress, |records: &[Record], out: &mut dyn Write| {
            let mut expired = Vec::new();
            for record in records {
                if record.expiration()? < today {
                    expired.push(record);
                }
            }
            if expired.is_empty() {
                writeln!(out, "No expired items found.").map_err(InventoryError::output)?;
                return Ok(Vec::new());
            }
            let sorted = sort_by_expiration(expired)?;
            write_expired(out, &sorted).map_err(InventoryError::output)?;
            Ok(sorted)
        });
        op(self.records.as_slice(), out)
    }
}

fn write_search_results(out: &mut dyn Write, item: &str, found: &[Record]) -> std::io::Result<()> {
    writeln!(out, "\nSearch Results for '{}'", item)?;
    writeln!(
        out,
        "{:<20} {:<10} {:<20} {:<10}",
        "Item", "Quantity", "Expiration Date", "Price"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for record in found {
        writeln!(
            out,
            "{:<20} {:<10} {:<20} {:<10}",
            record.item, record.quantity, record.expiration_date, record.price
        )?;
    }
    Ok(())
}

fn write_full_report(out: &mut dyn Write, sorted: &[Record]) -> std::io::Result<()> {
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "\nFull Inventory Report")?;
    writeln!(
        out,
        "|{:<20} | {:<10} | {:<20} | {:<10}|",
        "Item", "Quantity", "Expiration Date", "Price"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for record in sorted {
        writeln!(
            out,
            "|{:<20} | {:<10} | {:<20} | {:<10}|",
            record.item, record.quantity, record.expiration_date, record.price
        )?;
    }
    Ok(())
}

fn write_expired(out: &mut dyn Write, sorted: &[Record]) -> std::io::Result<()> {
    writeln!(out, "\nExpired Items")?;
    writeln!(
        out,
        "{:<20} {:<10} {:<15} {:<10}",
        "Item", "Quantity", "Expiration Date", "Price"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for record in sorted {
        writeln!(
            out,
            "{:<20} {:<10} {:<15} {:<10}",
            record.item, record.quantity, record.expiration_date, record.price
        )?;
    }
    Ok(())
}
