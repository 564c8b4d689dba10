//! Record store
//!
//! Loads the whole inventory from a CSV file and writes it back wholesale.
//! There is no indexing and no incremental update: every save replaces the
//! entire file with the current in-memory record set.

use crate::error::{ErrorCategory, ErrorKind, InventoryError, Result};
use crate::record::Record;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header row written at the top of every saved file.
pub const HEADER: [&str; 4] = ["item", "quantity", "expiration_date", "price"];

/// File used when no other location is configured.
pub const DEFAULT_FILENAME: &str = "warehouse_inventory.csv";

/// Load/save boundary to the persisted flat file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the file, in file order.
    ///
    /// A file holding only a header (or nothing at all) yields an empty
    /// inventory. A missing file is an error; it is never created here.
    pub fn load(&self) -> Result<Vec<Record>> {
        let contents = fs::read(&self.path).map_err(|e| read_error(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(contents.as_slice());

        let records = reader
            .deserialize::<Record>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                InventoryError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Format,
                    format!("malformed inventory file {}", self.path.display()),
                    e,
                )
            })?;

        debug!(path = %self.path.display(), records = records.len(), "loaded inventory");
        Ok(records)
    }

    /// Replace the file's contents with `records`, header first.
    ///
    /// The new contents are written to a temporary file next to the target,
    /// synced, and renamed over it, so a failed save leaves the previous
    /// file in place.
    pub fn save(&self, records: &[Record]) -> Result<()> {
        let encoded = encode(records)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to create tempfile",
                e,
            )
        })?;

        temp_file.write_all(&encoded).map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to write to tempfile",
                e,
            )
        })?;
        temp_file.flush().map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to flush tempfile",
                e,
            )
        })?;
        temp_file.as_file().sync_all().map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                "failed to sync file prior to rename",
                e,
            )
        })?;

        // Keep whatever permissions the existing inventory file had.
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp_file
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| {
                    InventoryError::with_kind_and_source(
                        ErrorCategory::Internal,
                        ErrorKind::Io,
                        "failed to set tempfile permissions",
                        e,
                    )
                })?;
        }

        temp_file.persist(&self.path).map_err(|e| {
            InventoryError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to rename to target file {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), records = records.len(), "saved inventory");
        Ok(())
    }
}

/// Serialize the header and records as CRLF-terminated CSV with minimal quoting.
fn encode(records: &[Record]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(encode_error)?;
    for record in records {
        writer.serialize(record).map_err(encode_error)?;
    }

    writer.into_inner().map_err(|e| {
        InventoryError::with_kind(
            ErrorCategory::Internal,
            ErrorKind::InternalInvariant,
            format!("failed to flush CSV buffer: {}", e.error()),
        )
    })
}

fn encode_error(err: csv::Error) -> InventoryError {
    InventoryError::with_kind_and_source(
        ErrorCategory::Internal,
        ErrorKind::InternalInvariant,
        "failed to encode record",
        err,
    )
}

fn read_error(path: &Path, err: io::Error) -> InventoryError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    InventoryError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("milk", "4", "2025-01-10", "1.99"),
            Record::new("eggs, large", "12", "2025-01-03", "3.50"),
            Record::new("\"house\" bread", "2", "2024-12-30", "2.25"),
        ]
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("inventory.csv"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_of_loaded_records_is_fixed_point() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("inventory.csv"));

        store.save(&sample()).unwrap();
        let first = fs::read(store.path()).unwrap();

        let loaded = store.load().unwrap();
        store.save(&loaded).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_writes_header_and_minimal_quoting() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("inventory.csv"));

        store.save(&sample()).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "item,quantity,expiration_date,price\r\n\
             milk,4,2025-01-10,1.99\r\n\
             \"eggs, large\",12,2025-01-03,3.50\r\n\
             \"\"\"house\"\" bread\",2,2024-12-30,2.25\r\n"
        );
    }

    #[test]
    fn test_save_empty_still_writes_header() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path().join("inventory.csv"));

        store.save(&[]).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "item,quantity,expiration_date,price\r\n");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.csv");
        fs::write(&path, "item,quantity,expiration_date,price\n").unwrap();

        assert!(RecordStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_load_accepts_reordered_columns() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.csv");
        fs::write(
            &path,
            "price,item,expiration_date,quantity\n1.99,milk,2025-01-10,4\n",
        )
        .unwrap();

        let records = RecordStore::new(&path).load().unwrap();
        assert_eq!(records, vec![Record::new("milk", "4", "2025-01-10", "1.99")]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.csv");

        let err = RecordStore::new(&path).load().unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Io));
        assert_eq!(err.category, ErrorCategory::User);
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_column_is_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.csv");
        fs::write(&path, "item,quantity,price\nmilk,4,1.99\n").unwrap();

        let err = RecordStore::new(&path).load().unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::Format));
        let described = err.describe();
        assert!(described.starts_with("malformed inventory file"));
        assert!(described.contains("expiration_date"), "got: {}", described);
    }

    #[test]
    #[cfg(unix)]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.csv");
        fs::write(&path, "item,quantity,expiration_date,price\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        RecordStore::new(&path).save(&sample()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
