//! The diary entry data model.
//!
//! An [`Entry`] is created in full by the caller (fresh id, current
//! timestamp) and handed to the store as a unit. Its id, creation time and
//! images never change afterwards; comments are appended with
//! [`Entry::add_comment`] and the whole record is then written back through
//! the store's update operation.
//!
//! The serde representation is the on-disk record format: camelCase field
//! names, RFC 3339 timestamps and base64-encoded image blobs.

use crate::constants::DEFAULT_ACCENT_OPACITY;
use crate::mood;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;


/// A comment appended to an entry after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment with a fresh id.
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Comment {
            id: Uuid::new_v4(),
            text: text.into(),
            timestamp,
        }
    }
}

/// One diary record.
///
/// # Examples
///
/// ```
/// use moodiary::Entry;
///
/// let entry = Entry::builder("😊", "Day One", "Sunny walk by the river.")
///     .accent_color("#FFD60A")
///     .accent_opacity(0.5)
///     .build();
///
/// assert_eq!(entry.title(), "Day One");
/// assert_eq!(entry.accent_opacity(), 0.5);
/// assert!(entry.comments().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    id: Uuid,
    title: String,
    content: String,
    mood_marker: String,
    created_at: DateTime<Utc>,
    #[serde(default, with = "base64_blobs")]
    images: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accent_color: Option<String>,
    #[serde(
        default = "default_accent_opacity",
        deserialize_with = "deserialize_opacity"
    )]
    accent_opacity: f64,
    #[serde(default)]
    comments: Vec<Comment>,
}

fn default_accent_opacity() -> f64 {
    DEFAULT_ACCENT_OPACITY
}

fn deserialize_opacity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_opacity)
}

/// Clamps to `[0, 1]`; NaN and infinities fall back to the default.
fn clamp_opacity(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        DEFAULT_ACCENT_OPACITY
    }
}

impl Entry {
    /// Creates an entry with a fresh id, the current time and no extras.
    pub fn new(
        mood_marker: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::builder(mood_marker, title, content).build()
    }

    /// Starts building an entry. Id and timestamp default to fresh values.
    pub fn builder(
        mood_marker: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> EntryBuilder {
        EntryBuilder {
            id: None,
            created_at: None,
            title: title.into(),
            content: content.into(),
            mood_marker: mood_marker.into(),
            images: Vec::new(),
            accent_color: None,
            accent_opacity: DEFAULT_ACCENT_OPACITY,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mood_marker(&self) -> &str {
        &self.mood_marker
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn images(&self) -> &[Vec<u8>] {
        &self.images
    }

    /// The explicitly chosen accent, if any.
    pub fn accent_color(&self) -> Option<&str> {
        self.accent_color.as_deref()
    }

    pub fn accent_opacity(&self) -> f64 {
        self.accent_opacity
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// The accent to render: the chosen color, or the mood's default.
    pub fn effective_accent(&self) -> &str {
        self.accent_color
            .as_deref()
            .unwrap_or_else(|| mood::default_accent_for(&self.mood_marker))
    }

    /// Appends a comment and returns it.
    ///
    /// The change is in-memory only until the entry is passed to the
    /// store's update operation.
    /// Pins the creation time, which an update must not change.
    pub(crate) fn keep_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    pub fn add_comment(&mut self, text: impl Into<String>, timestamp: DateTime<Utc>) -> &Comment {
        self.comments.push(Comment::new(text, timestamp));
        &self.comments[self.comments.len() - 1]
    }
}

/// Builder for [`Entry`], used by callers that need to pin the id or
/// timestamp (imports, tests) or attach optional fields.
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
    title: String,
    content: String,
    mood_marker: String,
    images: Vec<Vec<u8>>,
    accent_color: Option<String>,
    accent_opacity: f64,
}

impl EntryBuilder {
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn image(mut self, bytes: Vec<u8>) -> Self {
        self.images.push(bytes);
        self
    }

    pub fn images(mut self, images: impl IntoIterator<Item = Vec<u8>>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn accent_color(mut self, hex: impl Into<String>) -> Self {
        self.accent_color = Some(hex.into());
        self
    }

    /// Sets the accent opacity, clamped to `[0, 1]`.
    pub fn accent_opacity(mut self, opacity: f64) -> Self {
        self.accent_opacity = clamp_opacity(opacity);
        self
    }

    pub fn build(self) -> Entry {
        Entry {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: self.title,
            content: self.content,
            mood_marker: self.mood_marker,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            images: self.images,
            accent_color: self.accent_color,
            accent_opacity: self.accent_opacity,
            comments: Vec::new(),
        }
    }
}

/// Serializes image blobs as a list of standard base64 strings.
mod base64_blobs {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(images: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(images.len()))?;
        for image in images {
            seq.serialize_element(&STANDARD.encode(image))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|blob| STANDARD.decode(blob).map_err(D::Error::custom))
            .collect()
    }
}
