//! Word set entity and its value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Opaque word set identifier backed by a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordSetId(Uuid);

impl WordSetId {
    /// Parse an identifier from its canonical string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw.as_ref()).map(Self)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for WordSetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of words.
///
/// ## Invariants
/// - Default sets (`is_default == true`) have no owner and are readable by
///   everyone but immutable through user-facing operations.
/// - User sets have exactly one owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordSet {
    /// Stable set identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: WordSetId,
    /// Display name, unique per owner.
    pub name: String,
    /// Owning user; `None` for shared default sets.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub owner: Option<UserId>,
    /// Whether this is the shared read-only default set.
    pub is_default: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a word set.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWordSet {
    pub name: String,
    pub owner: Option<UserId>,
    pub is_default: bool,
}
