//! Error handling utilities for the moodiary application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Storage failures inside the entry store are logged and swallowed; the
//! `StorageError` values below are what gets logged. Only the CLI and the
//! backup operations propagate errors to the user.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Represents failures while reading or writing the storage root.
///
/// Every variant carries the record path (or entry id) involved so a single
/// log line is enough to locate the offending file.
///
/// # Examples
///
/// ```
/// use moodiary::errors::StorageError;
/// use std::io::{self, ErrorKind};
/// use std::path::PathBuf;
///
/// let error = StorageError::RecordRead {
///     path: PathBuf::from("/entries/abc.json"),
///     source: io::Error::new(ErrorKind::PermissionDenied, "permission denied"),
/// };
///
/// assert!(format!("{}", error).contains("/entries/abc.json"));
/// assert!(format!("{}", error).contains("permission denied"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage root could not be created or enumerated.
    #[error("Storage root {path} is unavailable: {source}. Please check that the directory exists and is readable.")]
    DirectoryUnavailable {
        /// The storage root
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A record file exists but could not be read.
    #[error("Failed to read entry record {path}: {source}")]
    RecordRead {
        /// The record that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A record was read but is not a valid entry.
    #[error("Entry record {path} could not be decoded: {source}")]
    RecordDecode {
        /// The record that failed
        path: PathBuf,
        /// The underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// An in-memory entry could not be serialized.
    #[error("Failed to encode entry {id}: {source}")]
    RecordEncode {
        /// Id of the entry
        id: Uuid,
        /// The underlying encode error
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be written to disk.
    #[error("Failed to write entry record {path}: {source}. Please check disk space and directory permissions.")]
    RecordWrite {
        /// The record that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A record could not be removed from disk.
    #[error("Failed to remove entry record {path}: {source}")]
    RecordRemove {
        /// The record that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the entry store handle itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The owner thread has stopped; no further commands can be served.
    #[error("Entry store is no longer running")]
    Closed,

    /// The owner thread could not be started.
    #[error("Failed to start entry store: {0}")]
    Spawn(#[source] io::Error),
}

/// Represents errors from backup and restore operations.
///
/// # Examples
///
/// ```
/// use moodiary::errors::BackupError;
/// use std::path::PathBuf;
///
/// let error = BackupError::MissingArchive(PathBuf::from("/tmp/backup.tar.gz"));
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum BackupError {
    /// The storage root to back up does not exist.
    #[error("Entries directory not found: {0}")]
    MissingStorageRoot(PathBuf),

    /// The archive to restore does not exist.
    #[error("Backup archive not found: {0}")]
    MissingArchive(PathBuf),

    /// Building or writing the archive failed.
    #[error("Failed to create backup archive {path}: {source}")]
    Archive {
        /// The archive being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading or unpacking the archive failed.
    #[error("Failed to extract backup archive {path}: {source}. The archive may be corrupted.")]
    Extract {
        /// The archive being read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Represents all possible errors that can occur in the moodiary application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use moodiary::errors::AppError;
///
/// let error = AppError::Config("Entries directory path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Entries directory path is empty");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    ///
    /// This variant automatically converts from `std::io::Error` through the `From` trait.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid entry input (unknown id, bad color, unreadable image).
    #[error("Entry error: {0}")]
    Entry(String),

    /// Errors reading or writing entry records.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors talking to the entry store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Errors from backup and restore.
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;
