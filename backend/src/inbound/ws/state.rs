//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on domain ports (use-cases) rather than
//! constructing domain services directly, so the per-connection handler can
//! be exercised with deterministic test doubles.

use std::sync::Arc;

use crate::domain::ports::{SpeechSynthesizer, VocabularyCommand, VocabularyQuery};

/// Dependency bundle for the study WebSocket.
#[derive(Clone)]
pub struct WsState {
    pub query: Arc<dyn VocabularyQuery>,
    pub command: Arc<dyn VocabularyCommand>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

impl WsState {
    /// Construct state from explicit port implementations.
    pub fn new(
        query: Arc<dyn VocabularyQuery>,
        command: Arc<dyn VocabularyCommand>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            query,
            command,
            speech,
        }
    }
}
