//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Word, WordId, WordSet, WordSetId, UserId};

use super::schema::{users, word_sets, words};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub credential_digest: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not read by the application")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub credential_digest: &'a str,
}

/// Row struct for reading from the word_sets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = word_sets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WordSetRow {
    pub id: Uuid,
    pub name: String,
    pub owner: Option<Uuid>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WordSetRow> for WordSet {
    fn from(row: WordSetRow) -> Self {
        Self {
            id: WordSetId::from_uuid(row.id),
            name: row.name,
            owner: row.owner.map(UserId::from_uuid),
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating new word sets.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = word_sets)]
pub(crate) struct NewWordSetRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub owner: Option<Uuid>,
    pub is_default: bool,
}

/// Changeset struct for renaming a word set.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = word_sets)]
pub(crate) struct WordSetNameUpdate<'a> {
    pub name: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the words table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = words)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WordRow {
    pub id: Uuid,
    pub english: String,
    pub phonetic: Option<String>,
    pub type_tag: Option<String>,
    pub vietnamese: String,
    pub word_set: Uuid,
    pub owner: Option<Uuid>,
    pub remembered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WordRow> for Word {
    fn from(row: WordRow) -> Self {
        Self {
            id: WordId::from_uuid(row.id),
            english: row.english,
            phonetic: row.phonetic,
            type_tag: row.type_tag,
            vietnamese: row.vietnamese,
            word_set: WordSetId::from_uuid(row.word_set),
            owner: row.owner.map(UserId::from_uuid),
            remembered: row.remembered,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for creating new words.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = words)]
pub(crate) struct NewWordRow<'a> {
    pub id: Uuid,
    pub english: &'a str,
    pub phonetic: Option<&'a str>,
    pub type_tag: Option<&'a str>,
    pub vietnamese: &'a str,
    pub word_set: Uuid,
    pub owner: Option<Uuid>,
    pub remembered: bool,
}

/// Changeset struct for patching a word.
///
/// `None` fields are skipped by Diesel; `updated_at` is always set so the
/// changeset is never empty.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = words)]
pub(crate) struct WordChangeset<'a> {
    pub english: Option<&'a str>,
    pub phonetic: Option<&'a str>,
    pub type_tag: Option<&'a str>,
    pub vietnamese: Option<&'a str>,
    pub remembered: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
