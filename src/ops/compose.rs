//! Building entries and comments from user input.
//!
//! The store accepts whatever it is handed; the checks a form would do
//! (non-empty title and content, a sensible color and opacity) live here.

use crate::entry::Entry;
use crate::errors::{AppError, AppResult};
use crate::mood::normalize_hex_color;
use crate::store::EntryStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Raw input for a new entry, as collected by the CLI.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub mood: String,
    pub title: String,
    pub content: String,
    pub images: Vec<PathBuf>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

/// Validates input and builds a fully populated entry created at `now`.
///
/// # Errors
///
/// Returns `AppError::Entry` if:
/// - the mood, title or content is blank
/// - the color is not `#RRGGBB` / `#RRGGBBAA`
/// - the opacity is outside `[0, 1]`
/// - an image file cannot be read
pub fn compose_entry(input: &NewEntry, now: DateTime<Utc>) -> AppResult<Entry> {
    let mood = require_text("Mood", &input.mood)?;
    let title = require_text("Title", &input.title)?;
    let content = require_text("Content", &input.content)?;

    let mut builder = Entry::builder(mood, title, content).created_at(now);

    if let Some(color) = &input.color {
        let hex = normalize_hex_color(color).ok_or_else(|| {
            AppError::Entry(format!(
                "Invalid accent color '{}'. Use #RRGGBB or #RRGGBBAA",
                color
            ))
        })?;
        builder = builder.accent_color(hex);
    }

    if let Some(opacity) = input.opacity {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(AppError::Entry(format!(
                "Accent opacity must be between 0 and 1, got {}",
                opacity
            )));
        }
        builder = builder.accent_opacity(opacity);
    }

    for path in &input.images {
        let bytes = fs::read(path).map_err(|e| {
            AppError::Entry(format!("Failed to read image {}: {}", path.display(), e))
        })?;
        debug!("Attaching image of {} bytes", bytes.len());
        builder = builder.image(bytes);
    }

    Ok(builder.build())
}

fn require_text<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Entry(format!("{} cannot be empty", field)));
    }
    Ok(trimmed)
}

/// Resolves a full id or a unique id prefix against `entries`.
///
/// Returns `Ok(None)` when nothing matches.
///
/// # Errors
///
/// Returns `AppError::Entry` when a prefix matches more than one entry.
pub fn resolve_entry_id(entries: &[Entry], query: &str) -> AppResult<Option<Uuid>> {
    let query = query.trim().to_ascii_lowercase();

    if let Ok(id) = Uuid::parse_str(&query) {
        return Ok(entries.iter().any(|e| e.id() == id).then_some(id));
    }
    if query.is_empty() {
        return Ok(None);
    }

    let mut matches = entries
        .iter()
        .map(Entry::id)
        .filter(|id| id.to_string().starts_with(&query));

    match (matches.next(), matches.next()) {
        (None, _) => Ok(None),
        (Some(id), None) => Ok(Some(id)),
        (Some(_), Some(_)) => Err(AppError::Entry(format!(
            "Id prefix '{}' matches more than one entry",
            query
        ))),
    }
}

/// Appends a comment to the entry with `id` and writes it back.
///
/// Returns the updated entry, or `None` when the id is unknown.
pub async fn comment_on_entry(
    store: &EntryStore,
    id: Uuid,
    text: &str,
    now: DateTime<Utc>,
) -> AppResult<Option<Entry>> {
    let text = require_text("Comment", text)?;
    let Some(mut entry) = store.get(id) else {
        return Ok(None);
    };

    entry.add_comment(text, now);
    if !store.update(entry.clone()).await? {
        return Ok(None);
    }

    info!(%id, comments = entry.comments().len(), "Added comment");
    Ok(Some(entry))
}
