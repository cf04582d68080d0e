//! Logging `SpeechSynthesizer` adapter.
//!
//! Pronunciation is rendered client-side; the server-side port exists so a
//! real synthesiser can slot in later. This adapter records the request and
//! reports success.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{SpeechError, SpeechSynthesizer};

/// Speech adapter that only logs what it would pronounce.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for TracingSpeechSynthesizer {
    async fn speak(&self, text: &str, locale: &str) -> Result<(), SpeechError> {
        debug!(text, locale, "pronunciation requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn speaking_always_succeeds() {
        let speech = TracingSpeechSynthesizer;
        assert!(speech.speak("hello", "en-US").await.is_ok());
    }
}
