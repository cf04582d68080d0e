//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// Learner accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email, unique per account.
        email -> Varchar,
        /// Opaque digest of the login credential.
        credential_digest -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named collections of words.
    ///
    /// `owner` is null for the shared default sets flagged by `is_default`.
    word_sets (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name; unique per owner at the application level.
        name -> Varchar,
        /// Owning user, or null for shared defaults.
        owner -> Nullable<Uuid>,
        /// Marks the shared read-only starter sets.
        is_default -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vocabulary entries.
    ///
    /// There is intentionally no unique index on `(owner, word_set, english)`;
    /// duplicate suppression is an ingestion-time courtesy, not a constraint.
    words (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// English side of the card.
        english -> Varchar,
        /// Optional phonetic transcription.
        phonetic -> Nullable<Varchar>,
        /// Optional part-of-speech tag.
        type_tag -> Nullable<Varchar>,
        /// Vietnamese side of the card.
        vietnamese -> Varchar,
        /// Parent word set.
        word_set -> Uuid,
        /// Owning user, or null for words in default sets.
        owner -> Nullable<Uuid>,
        /// Learner progress flag.
        remembered -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(words -> word_sets (word_set));

diesel::allow_tables_to_appear_in_same_query!(users, word_sets, words);
