//! JSON message envelope for the study WebSocket.
//!
//! Client frames select content and drive the engines; server frames carry
//! the resulting view state. Both sides use a `type`-tagged envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::study::{CardFace, FilterMode, OrderMode};
use crate::domain::{Error, Word};

/// Frames accepted from the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Study a single set, or everything visible when `wordSet` is absent.
    #[serde(rename_all = "camelCase")]
    SelectSet { word_set: Option<Uuid> },
    /// Change the study filter.
    SetFilter { filter: FilterMode },
    /// Change the presentation order.
    SetOrder { order: OrderMode },
    /// Show the next card.
    Next,
    /// Show the previous card.
    Prev,
    /// Flip the current card.
    Flip,
    /// Completed swipe gesture; `delta` is end minus start position.
    Swipe { delta: f64 },
    /// Toggle the current card's remembered flag.
    MarkRemembered,
    /// Pronounce the current card's English side.
    Pronounce,
    /// Re-read the deck from storage.
    Refresh,
    /// Start a quiz over the given sets (empty means everything visible).
    #[serde(rename_all = "camelCase")]
    StartQuiz { word_sets: Vec<Uuid> },
    /// Answer the current quiz question by option identity.
    #[serde(rename_all = "camelCase")]
    AnswerQuiz { word_id: Uuid },
    /// Restart the current quiz with the same pool.
    RestartQuiz,
    /// Abandon the quiz and return to studying.
    EndQuiz,
}

/// One quiz choice: the id to answer with and the text to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub word_id: Uuid,
    pub vietnamese: String,
}

/// Frames sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The current card and deck position.
    Card {
        word: Word,
        face: CardFace,
        position: usize,
        total: usize,
    },
    /// The active filter selects no cards.
    NothingToStudy,
    /// The current quiz question.
    QuizQuestion {
        prompt: String,
        options: Vec<QuizOption>,
        index: usize,
        total: usize,
    },
    /// Outcome of the last answer, with the running score.
    QuizAnswer {
        correct: bool,
        #[serde(rename = "correctWordId")]
        correct_word_id: Uuid,
        #[serde(rename = "scoreCorrect")]
        score_correct: usize,
        #[serde(rename = "scoreAnswered")]
        score_answered: usize,
    },
    /// The quiz is over.
    QuizFinished { correct: usize, answered: usize },
    /// The quiz could not start.
    QuizRejected { available: usize, required: usize },
    /// A recoverable failure the client may surface.
    Error { error: Error },
}
