//! Tag join entity: "this user appears in this photo".

use serde::{Deserialize, Serialize};

use crate::domain::photo::PhotoId;

/// Many-to-many association between a photo and a user.
///
/// No uniqueness constraint exists, so duplicate rows for the same pair are
/// possible and preserved. Referential integrity is not enforced either:
/// rows may reference identifiers or logins that no longer resolve, and
/// readers skip such dangling references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub photo_id: PhotoId,
    pub user_login: String,
}

impl Tag {
    pub fn new(photo_id: PhotoId, user_login: impl Into<String>) -> Self {
        Self {
            photo_id,
            user_login: user_login.into(),
        }
    }
}
