//! High-level operations driven by the command line.
//!
//! This module provides user-facing operations that sit between the CLI and
//! the entry store: turning raw input into entries and comments, and
//! backing up or restoring the entries directory.

pub mod backup;
pub mod compose;

// Re-export commonly used functions
pub use backup::{create_backup, restore_backup, BackupReport, RestoreReport};
pub use compose::{comment_on_entry, compose_entry, resolve_entry_id, NewEntry};
