//! Entry record I/O and storage root management.
//!
//! Each entry lives in its own pretty-printed JSON file named `<id>.json`
//! inside the storage root. Writes go through a temp file in the same
//! directory followed by a rename, so a record is never observed half
//! written.

use crate::constants::{RECORD_FILE_EXTENSION, RECORD_TEMP_PREFIX};
use crate::entry::Entry;
use crate::errors::{AppError, AppResult, StorageError};
use std::fs;
#[cfg(unix)]
use std::fs::Permissions;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Durable storage for entry records.
///
/// Implementations report failures; deciding to log and skip them is left
/// to [`load_entries`] and the store.
pub trait EntryStorage: Send {
    /// Reads every record in the storage root.
    ///
    /// The outer error means the root itself could not be enumerated. Each
    /// inner result is one record, so a single bad file does not hide the
    /// others.
    fn read_all(&self) -> Result<Vec<Result<Entry, StorageError>>, StorageError>;

    /// Writes or overwrites the record for `entry`.
    fn write(&self, entry: &Entry) -> Result<(), StorageError>;

    /// Removes the record for `id`. Removing a missing record succeeds.
    fn remove(&self, id: Uuid) -> Result<(), StorageError>;
}

/// Loads all readable entries, logging and skipping everything else.
///
/// An unreadable storage root yields an empty list. The result is in
/// storage order; callers sort it.
pub fn load_entries(storage: &dyn EntryStorage) -> Vec<Entry> {
    let records = match storage.read_all() {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Could not enumerate entries, loading none");
            return Vec::new();
        }
    };

    let total = records.len();
    let entries: Vec<Entry> = records
        .into_iter()
        .filter_map(|record| match record {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry record");
                None
            }
        })
        .collect();

    info!(
        loaded = entries.len(),
        skipped = total - entries.len(),
        "Loaded entries"
    );
    entries
}

/// Ensures the entries directory exists, creating it if necessary.
///
/// Newly created directories get owner-only permissions on unix.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails
pub fn ensure_entries_directory_exists(entries_dir: &Path) -> AppResult<()> {
    if !entries_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Entries directory path must be absolute: {}",
            entries_dir.display()
        )));
    }

    if !entries_dir.exists() {
        fs::create_dir_all(entries_dir).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create entries directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(entries_dir, permissions).map_err(|e| {
                AppError::Io(io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to set secure permissions on entries directory: {}",
                        e
                    ),
                ))
            })?;
            debug!("Set 0o700 permissions on entries directory");
        }
    }
    Ok(())
}

/// Returns the record file name for an entry id.
pub fn record_file_name(id: Uuid) -> String {
    format!("{}.{}", id, RECORD_FILE_EXTENSION)
}

/// Returns true when `path` looks like a finished entry record.
///
/// In-flight temp files and anything without the record extension are
/// ignored.
pub fn is_record_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with(RECORD_TEMP_PREFIX)
        && path.extension().and_then(|e| e.to_str()) == Some(RECORD_FILE_EXTENSION)
}

/// Encodes an entry exactly as it is written to disk.
pub fn encode_record(entry: &Entry) -> Result<Vec<u8>, StorageError> {
    let mut bytes =
        serde_json::to_vec_pretty(entry).map_err(|source| StorageError::RecordEncode {
            id: entry.id(),
            source,
        })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// One-file-per-entry storage in a local directory.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
}

impl FileSystemStorage {
    /// Opens storage at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        ensure_entries_directory_exists(&root)?;
        Ok(FileSystemStorage { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `id`.
    pub fn record_path(&self, id: Uuid) -> PathBuf {
        self.root.join(record_file_name(id))
    }

    fn read_record(&self, path: &Path) -> Result<Entry, StorageError> {
        let bytes = fs::read(path).map_err(|source| StorageError::RecordRead {
            path: path.to_path_buf(),
            source,
        })?;
        let entry: Entry =
            serde_json::from_slice(&bytes).map_err(|source| StorageError::RecordDecode {
                path: path.to_path_buf(),
                source,
            })?;

        // A copied or renamed file would otherwise shadow the real record.
        if path.file_name().and_then(|n| n.to_str()) != Some(record_file_name(entry.id()).as_str()) {
            return Err(StorageError::RecordRead {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("file name does not match entry id {}", entry.id()),
                ),
            });
        }

        Ok(entry)
    }
}

/// Sorted record files from a directory listing.
///
/// A listing item that fails is logged and skipped like a bad record.
fn record_paths<I>(listing: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut paths: Vec<PathBuf> = listing
        .into_iter()
        .filter_map(|item| match item {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|path| path.is_file() && is_record_path(path))
        .collect();
    paths.sort();
    paths
}

impl EntryStorage for FileSystemStorage {
    fn read_all(&self) -> Result<Vec<Result<Entry, StorageError>>, StorageError> {
        let unavailable = |source| StorageError::DirectoryUnavailable {
            path: self.root.clone(),
            source,
        };

        let listing = fs::read_dir(&self.root).map_err(unavailable)?;
        let paths = record_paths(listing.map(|dir_entry| dir_entry.map(|d| d.path())));

        debug!("Found {} entry records in storage root", paths.len());
        Ok(paths.iter().map(|path| self.read_record(path)).collect())
    }

    fn write(&self, entry: &Entry) -> Result<(), StorageError> {
        let path = self.record_path(entry.id());
        let bytes = encode_record(entry)?;
        let write_error = |source| StorageError::RecordWrite {
            path: path.clone(),
            source,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(RECORD_TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(write_error)?;
        temp.write_all(&bytes).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        #[cfg(unix)]
        temp.as_file()
            .set_permissions(Permissions::from_mode(
                crate::constants::DEFAULT_FILE_PERMISSIONS,
            ))
            .map_err(write_error)?;

        temp.persist(&path).map_err(|e| write_error(e.error))?;
        debug!(id = %entry.id(), "Wrote entry record");
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<(), StorageError> {
        let path = self.record_path(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%id, "Removed entry record");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::RecordRemove { path, source }),
        }
    }
}
