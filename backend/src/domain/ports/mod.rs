//! Domain ports: driven repository traits and driving use-case traits.
//!
//! Adapters implement the driven ports; inbound adapters depend on the
//! driving ports. Each port ships a `Fixture*` implementation for tests that
//! do not exercise it and a mockall mock under `cfg(test)`.

mod login_service;
mod speech;
mod user_repository;
mod vocabulary_command;
mod vocabulary_query;
mod word_repository;
mod word_set_repository;

pub use login_service::{Credentials, FixtureLoginService, LoginService};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use speech::{FixtureSpeechSynthesizer, SpeechError, SpeechSynthesizer};
#[cfg(test)]
pub use speech::MockSpeechSynthesizer;
pub use user_repository::{
    FixtureUserRepository, NewUserRecord, UserRecord, UserRepository, UserRepositoryError,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use vocabulary_command::{
    CreateWordSetRequest, DeleteWordRequest, DeleteWordSetRequest, DeleteWordSetResponse,
    FixtureVocabularyCommand, IngestWordsRequest, IngestWordsResponse, RenameWordSetRequest,
    SetRememberedRequest, UpdateWordRequest, VocabularyCommand,
};
#[cfg(test)]
pub use vocabulary_command::MockVocabularyCommand;
pub use vocabulary_query::{
    FixtureVocabularyQuery, ListWordSetsRequest, ListWordSetsResponse, ListWordsRequest,
    ListWordsResponse, VocabularyQuery,
};
#[cfg(test)]
pub use vocabulary_query::MockVocabularyQuery;
pub use word_repository::{FixtureWordRepository, WordRepository, WordRepositoryError};
#[cfg(test)]
pub use word_repository::MockWordRepository;
pub use word_set_repository::{
    FixtureWordSetRepository, WordSetRepository, WordSetRepositoryError,
};
#[cfg(test)]
pub use word_set_repository::MockWordSetRepository;
