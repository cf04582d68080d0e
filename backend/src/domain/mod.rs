//! Domain layer: entities, pure policy, study engines, services, and ports.
//!
//! Nothing in this module performs I/O. Adapters live under
//! [`crate::inbound`] and [`crate::outbound`] and talk to the domain through
//! the traits in [`ports`].

mod error;
pub mod ingestion;
pub mod ports;
pub mod quiz;
pub mod study;
mod user;
pub mod visibility;
mod vocabulary_service;
mod word;
mod word_set;

pub use error::{Error, ErrorCode, ErrorValidationError};
pub use user::{Email, EmailValidationError, User, UserId};
pub use vocabulary_service::VocabularyService;
pub use word::{CandidateWord, NewWord, PopulatedWord, Word, WordId, WordPatch};
pub use word_set::{NewWordSet, WordSet, WordSetId};
