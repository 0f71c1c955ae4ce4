use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::NotesConfig;

/// A note snapshot as carried inside a share link (schema v1).
///
/// `title` and `content` are always present (possibly empty). `updated_at`
/// keeps the sender's exact JSON number so a round trip is lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedNote {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Epoch milliseconds
    pub updated_at: serde_json::Number,
}

impl SharedNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>, updated_at_ms: i64) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            bg_color: None,
            text_color: None,
            id: None,
            tags: None,
            updated_at: updated_at_ms.into(),
        }
    }

    /// `updatedAt` as whole epoch milliseconds, if it fits.
    pub fn updated_at_millis(&self) -> Option<i64> {
        self.updated_at
            .as_i64()
            .or_else(|| self.updated_at.as_f64().map(|f| f as i64))
    }

    /// Title for display; blank titles read as "Untitled".
    pub fn display_title(&self) -> &str {
        match self.title.trim() {
            "" => "Untitled",
            t => t,
        }
    }

    /// Turn a received note into something the note store can insert.
    pub fn to_draft(&self, defaults: &NotesConfig) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            bg_color: self
                .bg_color
                .clone()
                .unwrap_or_else(|| defaults.default_bg_color.clone()),
            text_color: self
                .text_color
                .clone()
                .unwrap_or_else(|| defaults.default_text_color.clone()),
        }
    }
}

/// The versioned envelope around a [`SharedNote`].
///
/// Only version 1 exists. The `v` field is emitted on serialization and
/// checked by the payload validator; it is not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SharePayload {
    pub note: SharedNote,
}

impl SharePayload {
    pub const VERSION: u8 = 1;

    pub fn new(note: SharedNote) -> Self {
        Self { note }
    }

    /// Snapshot a stored note for sharing. The store's id is not shared.
    pub fn from_stored(note: &StoredNote) -> Self {
        Self {
            note: SharedNote {
                title: note.title.clone(),
                content: note.content.clone(),
                bg_color: Some(note.bg_color.clone()),
                text_color: Some(note.text_color.clone()),
                id: None,
                tags: None,
                updated_at: note.updated_at.into(),
            },
        }
    }
}

impl Serialize for SharePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SharePayload", 2)?;
        s.serialize_field("v", &Self::VERSION)?;
        s.serialize_field("note", &self.note)?;
        s.end()
    }
}

/// A note as kept by the local note store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub bg_color: String,
    pub text_color: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

/// Fields handed to the note store when a recipient saves a shared note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub bg_color: String,
    pub text_color: String,
}
