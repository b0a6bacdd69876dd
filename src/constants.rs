//! Constants used throughout the application.
//!
//! This module contains all constants used in the Moodiary application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "moodiary";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A mood diary with one file per entry";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when `--verbose` is passed.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the entries directory.
pub const ENV_VAR_MOODIARY_DIR: &str = "MOODIARY_DIR";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory for entries within the user's home directory.
pub const DEFAULT_ENTRIES_SUBDIR: &str = ".moodiary/entries";

// Validation
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Entry Defaults
/// Accent opacity used when a record carries none.
pub const DEFAULT_ACCENT_OPACITY: f64 = 0.8;
/// Accent applied when the mood marker is not part of the palette.
pub const FALLBACK_ACCENT_HEX: &str = "#8E8E93";

// File System Parameters
/// File extension for entry records.
pub const RECORD_FILE_EXTENSION: &str = "json";
/// Prefix for in-flight temp files inside the storage root.
pub const RECORD_TEMP_PREFIX: &str = ".moodiary-";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Store
/// Capacity of the store's command queue.
pub const STORE_COMMAND_CAPACITY: usize = 64;
/// Name given to the store's owner thread.
pub const STORE_THREAD_NAME: &str = "entry-store";

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "moodiary";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
