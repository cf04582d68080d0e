//! Word entity, candidate input shape, and mutation payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId, WordSet, WordSetId};

/// Opaque word identifier backed by a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(Uuid);

impl WordId {
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

impl std::fmt::Display for WordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vocabulary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Stable word identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: WordId,
    /// The English side of the card.
    pub english: String,
    /// Optional phonetic transcription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Optional free-text part-of-speech tag.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    /// The Vietnamese side of the card.
    pub vietnamese: String,
    /// Parent word set.
    #[schema(value_type = String, format = Uuid)]
    pub word_set: WordSetId,
    /// Owning user; `None` for words in default sets.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub owner: Option<UserId>,
    /// Learner progress flag.
    pub remembered: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A word together with its parent set, as returned by visibility queries.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedWord {
    /// The word itself.
    #[serde(flatten)]
    pub word: Word,
    /// The parent set, embedded for the client.
    pub word_set_detail: WordSet,
}

/// Validated candidate for bulk ingestion.
///
/// ## Invariants
/// - `english` and `vietnamese` are non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateWord {
    /// The English side of the card.
    pub english: String,
    /// Optional phonetic transcription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Optional free-text part-of-speech tag.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    /// The Vietnamese side of the card.
    pub vietnamese: String,
    /// Target word set.
    #[schema(value_type = String, format = Uuid)]
    pub word_set: WordSetId,
}

impl CandidateWord {
    /// Validate the required text fields, reporting the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        require_text("english", &self.english)?;
        require_text("vietnamese", &self.vietnamese)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(
            Error::invalid_request(format!("{field} must not be empty"))
                .with_details(json!({ "field": field })),
        );
    }
    Ok(())
}

/// Insert payload produced by the ingestion path.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWord {
    pub english: String,
    pub phonetic: Option<String>,
    pub type_tag: Option<String>,
    pub vietnamese: String,
    pub word_set: WordSetId,
    pub owner: Option<UserId>,
    pub remembered: bool,
}

impl NewWord {
    /// Stamp a candidate with its owner, overriding any supplied value.
    pub fn from_candidate(candidate: CandidateWord, owner: Option<UserId>) -> Self {
        Self {
            english: candidate.english,
            phonetic: candidate.phonetic,
            type_tag: candidate.type_tag,
            vietnamese: candidate.vietnamese,
            word_set: candidate.word_set,
            owner,
            remembered: false,
        }
    }
}

/// Partial update for a word. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordPatch {
    pub english: Option<String>,
    pub phonetic: Option<String>,
    pub type_tag: Option<String>,
    pub vietnamese: Option<String>,
    pub remembered: Option<bool>,
}

impl WordPatch {
    /// Reject updates that would blank a required field.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(english) = &self.english {
            require_text("english", english)?;
        }
        if let Some(vietnamese) = &self.vietnamese {
            require_text("vietnamese", vietnamese)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn candidate(english: &str, vietnamese: &str) -> CandidateWord {
        CandidateWord {
            english: english.to_owned(),
            phonetic: None,
            type_tag: None,
            vietnamese: vietnamese.to_owned(),
            word_set: WordSetId::random(),
        }
    }

    #[rstest]
    #[case("", "xin chào", "english")]
    #[case("hello", "  ", "vietnamese")]
    fn candidate_rejects_blank_required_fields(
        #[case] english: &str,
        #[case] vietnamese: &str,
        #[case] field: &str,
    ) {
        let err = candidate(english, vietnamese)
            .validate()
            .expect_err("validation fails");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details present");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some(field));
    }

    #[rstest]
    fn candidate_accepts_minimal_fields() {
        assert!(candidate("hello", "xin chào").validate().is_ok());
    }

    #[rstest]
    fn new_word_overrides_owner_and_defaults_remembered() {
        let owner = UserId::random();
        let word = NewWord::from_candidate(candidate("hello", "xin chào"), Some(owner));
        assert_eq!(word.owner, Some(owner));
        assert!(!word.remembered);
    }

    #[rstest]
    fn patch_rejects_blanking_required_fields() {
        let patch = WordPatch {
            english: Some(String::new()),
            ..WordPatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[rstest]
    fn candidate_uses_type_alias_in_json() {
        let text = r#"{"english":"run","type":"verb","vietnamese":"chạy","wordSet":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}"#;
        let parsed: CandidateWord = serde_json::from_str(text).expect("candidate parses");
        assert_eq!(parsed.type_tag.as_deref(), Some("verb"));
    }
}
