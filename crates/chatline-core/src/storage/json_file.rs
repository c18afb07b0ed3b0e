//! Whole-file JSON transcript records guarded by advisory locks.

use std::fs::{self, File};
use std::io::{self, Read as _, Seek, SeekFrom, Write as _};
use std::path::Path;

use tracing::warn;

use crate::error::CoreError;
use crate::model::TranscriptEntry;

/// Decode a record. A document that is valid JSON but not an array is
/// treated as empty; array elements that are not entries are skipped.
pub fn decode_entries(data: &str) -> Result<Vec<TranscriptEntry>, CoreError> {
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(data)?;
    let serde_json::Value::Array(items) = value else {
        warn!("Transcript record is not a list, treating it as empty");
        return Ok(Vec::new());
    };
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("Skipping malformed transcript entry: {e}"),
        }
    }
    Ok(entries)
}

/// Read a record under a shared lock. `Ok(None)` when the file is absent.
pub fn read_entries(path: &Path) -> Result<Option<Vec<TranscriptEntry>>, CoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    fs2::FileExt::lock_shared(&file)?;
    let mut data = String::new();
    let read = (&file).read_to_string(&mut data);
    fs2::FileExt::unlock(&file)?;
    read?;
    decode_entries(&data).map(Some)
}

/// Replace a record wholesale under an exclusive lock.
pub fn write_entries(path: &Path, entries: &[TranscriptEntry]) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(entries)?;
    ensure_parent(path)?;
    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    fs2::FileExt::lock_exclusive(&file)?;
    let written = overwrite(&file, json.as_bytes());
    fs2::FileExt::unlock(&file)?;
    written
}

/// Read-modify-write a record while holding its exclusive lock.
///
/// An unreadable or malformed existing record starts from empty.
pub fn update_entries<F>(path: &Path, update: F) -> Result<(), CoreError>
where
    F: FnOnce(&mut Vec<TranscriptEntry>),
{
    ensure_parent(path)?;
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    fs2::FileExt::lock_exclusive(&file)?;

    // Re-read under lock to get the latest state
    let mut data = String::new();
    let mut entries = match (&file).read_to_string(&mut data) {
        Ok(_) => decode_entries(&data).unwrap_or_else(|e| {
            warn!("Discarding corrupt record {}: {e}", path.display());
            Vec::new()
        }),
        Err(e) => {
            warn!("Could not read {}: {e}", path.display());
            Vec::new()
        }
    };
    update(&mut entries);

    let written = serde_json::to_string_pretty(&entries)
        .map_err(CoreError::from)
        .and_then(|json| overwrite(&file, json.as_bytes()));
    fs2::FileExt::unlock(&file)?;
    written
}

fn overwrite(mut file: &File, bytes: &[u8]) -> Result<(), CoreError> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
