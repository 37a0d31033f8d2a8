//! Contact list loading.
//!
//! Parses an uploaded two-column CSV (name, phone) into an ordered
//! [`ContactBatch`]. No header row is expected; a header row present in the
//! input is consumed as a data row and will fail phone validation
//! downstream rather than here.

use crate::error::{UploadError, UploadResult};
use crate::models::{Contact, ContactBatch};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Parse CSV from any reader into a `ContactBatch`, preserving row order.
///
/// Every row must split into exactly two fields; the first offending row
/// aborts the load with `UploadError::Format`. An empty input yields an
/// empty batch.
pub fn load_contacts<R: Read>(reader: R) -> UploadResult<ContactBatch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut contacts = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = record.map_err(|e| UploadError::Format {
            row,
            reason: e.to_string(),
        })?;

        if record.len() != 2 {
            return Err(UploadError::Format {
                row,
                reason: format!("expected 2 fields, found {}", record.len()),
            });
        }

        contacts.push(Contact::new(&record[0], &record[1]));
    }

    Ok(ContactBatch::new(contacts))
}

/// Parse a CSV file on disk into a `ContactBatch`.
pub fn load_contacts_from_path(path: &Path) -> UploadResult<ContactBatch> {
    let file = File::open(path)?;
    load_contacts(file)
}
