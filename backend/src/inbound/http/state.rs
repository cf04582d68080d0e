//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, VocabularyCommand, VocabularyQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub query: Arc<dyn VocabularyQuery>,
    pub command: Arc<dyn VocabularyCommand>,
}

impl HttpState {
    /// Construct state from the three driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureLoginService, FixtureVocabularyCommand, FixtureVocabularyQuery,
    /// };
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureLoginService),
    ///     Arc::new(FixtureVocabularyQuery),
    ///     Arc::new(FixtureVocabularyCommand),
    /// );
    /// let _query = state.query.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        query: Arc<dyn VocabularyQuery>,
        command: Arc<dyn VocabularyCommand>,
    ) -> Self {
        Self {
            login,
            query,
            command,
        }
    }
}
