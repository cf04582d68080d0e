//! Bulk ingestion deduplication.
//!
//! Candidates are partitioned against the keys already persisted for the
//! caller. The key is the literal `(english, word_set)` pair with no case or
//! whitespace normalisation. Candidates within one batch are never compared
//! with each other, so a batch repeating the same new word inserts it twice.

use std::collections::HashSet;

use crate::domain::{CandidateWord, WordSetId};

/// Identity of a word for deduplication purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub english: String,
    pub word_set: WordSetId,
}

impl DedupKey {
    /// Key of an ingestion candidate.
    pub fn of_candidate(candidate: &CandidateWord) -> Self {
        Self {
            english: candidate.english.clone(),
            word_set: candidate.word_set,
        }
    }
}

/// Split candidates into accepted and duplicated, preserving batch order.
pub fn partition_candidates(
    candidates: Vec<CandidateWord>,
    existing: &HashSet<DedupKey>,
) -> (Vec<CandidateWord>, Vec<CandidateWord>) {
    candidates
        .into_iter()
        .partition(|candidate| !existing.contains(&DedupKey::of_candidate(candidate)))
}
