//! CSV score file.
//!
//! The file is the source of truth. Columns are matched by header name, so
//! their order does not matter; short rows leave the missing fields empty.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::{debug, info, warn};

use super::StorageError;
use crate::ingest::{normalize_rows, Normalized};
use crate::models::RawRow;

/// Read every row of the data file without validating it.
///
/// Rows the CSV layer cannot decode come back as empty rows so the
/// normalizer counts them as dropped.
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                // line 1 is the header
                warn!("Unreadable row at line {} in {:?}: {}", i + 2, path, e);
                rows.push(RawRow::default());
            }
        }
    }

    debug!("Read {} raw rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Read and normalize the data file.
pub fn load_records(path: &Path) -> Result<Normalized, StorageError> {
    let rows = read_raw_rows(path)?;
    Ok(normalize_rows(&rows))
}

fn ends_with_newline(path: &Path) -> Result<bool, StorageError> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Append rows to the data file, writing the header if the file is new.
pub fn append_rows(path: &Path, rows: &[RawRow]) -> Result<usize, StorageError> {
    if rows.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let needs_newline = !is_new && !ends_with_newline(path)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        // keep the first new row off the unterminated last line
        file.write_all(b"\n")?;
    }
    let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Appended {} rows to {:?}", rows.len(), path);
    Ok(rows.len())
}
