//! Driven port for text-to-speech pronunciation.

use async_trait::async_trait;

/// Errors raised by speech adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// The synthesiser is not available right now.
    #[error("speech synthesiser unavailable: {message}")]
    Unavailable { message: String },
}

impl SpeechError {
    /// Create an unavailable error with the given message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Fire-and-forget pronunciation port. Failures are never fatal to a study
/// session; callers log and carry on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Pronounce the text in the given BCP 47 locale.
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError>;
}

/// Fixture implementation that swallows every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for FixtureSpeechSynthesizer {
    async fn speak(&self, _text: &str, _locale: &str) -> Result<(), SpeechError> {
        Ok(())
    }
}
