//! Warehouse - command-line inventory tracker backed by a CSV file

#![forbid(unsafe_code)]

pub mod error;
pub mod guard;
pub mod inventory;
pub mod logging;
pub mod progress;
pub mod record;
pub mod shell;
pub mod store;
