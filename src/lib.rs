/*!
# Moodiary

Moodiary is a single-user mood diary. Each entry carries a mood marker, a
title, free text, optional photos, an accent color with opacity, and a list
of comments. Entries are kept newest first.

## Architecture

- `entry`: the `Entry` and `Comment` data model and its on-disk encoding
- `entry_core`: the ordered in-memory collection, free of I/O
- `entry_io`: one JSON file per entry inside the storage root
- `store`: `EntryStore`, the single owner that serializes loads and mutations
  and publishes snapshots to observers
- `mood`: the mood palette and accent color helpers
- `ops`: entry composition and backup/restore used by the CLI
- `cli`, `config`, `errors`, `constants`: the ambient application pieces

## Usage Example

```rust,no_run
use moodiary::{Config, Entry, EntryStore};

#[tokio::main]
async fn main() -> moodiary::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let store = EntryStore::open_in(&config.entries_dir)?;
    store.ready().await?;

    store.add(Entry::new("😊", "Day One", "Sunny walk by the river.")).await?;
    for entry in store.entries().iter() {
        println!("{} {}", entry.mood_marker(), entry.title());
    }
    Ok(())
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// The diary entry data model
pub mod entry;
/// Ordered in-memory entry collection
pub mod entry_core;
/// Entry record storage on disk
pub mod entry_io;
/// Error types and utilities for error handling
pub mod errors;
/// Mood palette and accent colors
pub mod mood;
/// User-facing operations
pub mod ops;
/// The single-owner entry store
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use entry::{Comment, Entry};
pub use errors::{AppError, AppResult};
pub use store::{EntriesSnapshot, EntryStore, PersistReport};
