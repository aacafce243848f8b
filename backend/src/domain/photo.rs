//! Photo content records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque photo identifier issued by the document store (or supplied by the
/// caller as a logical id before insert).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category tag attached to every photo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhotoCategory {
    Selfie,
    #[default]
    Portrait,
    Action,
    Landscape,
    Graphic,
}

/// Caller-supplied fields for the `postPhoto` mutation, before ownership and
/// creation metadata are stamped on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDraft {
    pub name: String,
    pub category: PhotoCategory,
    pub description: Option<String>,
}

/// Content record. Immutable once created; `posted_by` references the owning
/// user's login handle by value, not ownership.
///
/// The record carries two identifier slots: `id` is a logical identifier a
/// caller may supply pre-insert, `stored_id` is assigned by the store on
/// insert. [`Photo::identifier`] prefers the logical one so both shapes
/// resolve consistently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Option<PhotoId>,
    pub stored_id: Option<PhotoId>,
    pub name: String,
    pub description: Option<String>,
    pub category: PhotoCategory,
    pub posted_by: String,
    pub created: DateTime<Utc>,
}

impl Photo {
    /// Build the record inserted by `postPhoto`: draft fields merged with the
    /// owner handle and creation timestamp.
    pub fn from_draft(draft: PhotoDraft, posted_by: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id: None,
            stored_id: None,
            name: draft.name,
            description: draft.description,
            category: draft.category,
            posted_by: posted_by.into(),
            created,
        }
    }

    /// Exposed identifier: the logical id when present, else the stored one.
    pub fn identifier(&self) -> Option<&PhotoId> {
        self.id.as_ref().or(self.stored_id.as_ref())
    }

    /// Derived asset URL, computed from the store-assigned identifier.
    pub fn url(&self) -> Option<String> {
        self.stored_id
            .as_ref()
            .map(|id| format!("/img/photos/{id}.jpg"))
    }
}
