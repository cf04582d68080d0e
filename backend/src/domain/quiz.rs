//! Multiple-choice quiz engine.
//!
//! Questions are the shuffled pool; each question shows the correct word and
//! three distractors drawn from the rest of the pool. Answers compare word
//! identity, not text, so duplicate spellings cannot cause false positives.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{Word, WordId};

/// Smallest pool a quiz can be built from (one answer plus three distractors).
pub const MIN_QUIZ_POOL: usize = 4;

/// Number of choices shown per question.
pub const OPTION_COUNT: usize = 4;

/// Why a quiz could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuizStartError {
    /// The selected sets do not contain enough words.
    #[error("quiz needs at least {required} words, got {available}")]
    NotEnoughWords { available: usize, required: usize },
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Whether the selected option was the correct word.
    pub correct: bool,
    /// Identity of the correct word, for highlighting.
    pub correct_word_id: WordId,
}

/// Final tally exposed once every question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub answered: usize,
}

/// One quiz run over a fixed pool of words.
#[derive(Debug)]
pub struct QuizEngine<R: Rng> {
    pool: Vec<Word>,
    questions: Vec<Word>,
    index: usize,
    correct_count: usize,
    answered_count: usize,
    options: Vec<Word>,
    awaiting_advance: bool,
    rng: R,
}

impl<R: Rng> QuizEngine<R> {
    /// Start a quiz over the pool, shuffling question and option order.
    pub fn start(pool: Vec<Word>, rng: R) -> Result<Self, QuizStartError> {
        if pool.len() < MIN_QUIZ_POOL {
            return Err(QuizStartError::NotEnoughWords {
                available: pool.len(),
                required: MIN_QUIZ_POOL,
            });
        }
        let mut engine = Self {
            pool,
            questions: Vec::new(),
            index: 0,
            correct_count: 0,
            answered_count: 0,
            options: Vec::new(),
            awaiting_advance: false,
            rng,
        };
        engine.reshuffle();
        Ok(engine)
    }

    /// The word being asked, or `None` once the quiz is finished.
    pub fn current_question(&self) -> Option<&Word> {
        if self.is_finished() {
            return None;
        }
        self.questions.get(self.index)
    }

    /// Choices for the current question, in display order.
    pub fn options(&self) -> &[Word] {
        &self.options
    }

    /// Zero-based index of the current question.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total number of questions in this run.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// True once every question has been answered and advanced past.
    pub fn is_finished(&self) -> bool {
        self.index >= self.questions.len()
    }

    /// Tally of answers so far.
    pub fn score(&self) -> QuizScore {
        QuizScore {
            correct: self.correct_count,
            answered: self.answered_count,
        }
    }

    /// Answer the current question by the identity of the chosen option.
    ///
    /// Returns `None` when the quiz is finished or the current question has
    /// already been answered; the caller must `advance` first.
    pub fn answer(&mut self, selected: WordId) -> Option<AnswerOutcome> {
        if self.awaiting_advance {
            return None;
        }
        let question = self.current_question()?;
        let correct_word_id = question.id;
        let correct = selected == correct_word_id;

        self.answered_count += 1;
        if correct {
            self.correct_count += 1;
        }
        self.awaiting_advance = true;

        Some(AnswerOutcome {
            correct,
            correct_word_id,
        })
    }

    /// Move to the next question, recomputing options, or finish the run.
    pub fn advance(&mut self) {
        if self.is_finished() {
            return;
        }
        self.index += 1;
        self.awaiting_advance = false;
        if self.is_finished() {
            self.options.clear();
        } else {
            self.compute_options();
        }
    }

    /// Start over with the same pool, reshuffling everything.
    pub fn restart(&mut self) {
        self.reshuffle();
    }

    fn reshuffle(&mut self) {
        self.questions = self.pool.clone();
        self.questions.shuffle(&mut self.rng);
        self.index = 0;
        self.correct_count = 0;
        self.answered_count = 0;
        self.awaiting_advance = false;
        self.compute_options();
    }

    fn compute_options(&mut self) {
        let Some(question) = self.questions.get(self.index) else {
            self.options.clear();
            return;
        };
        let question = question.clone();

        let mut distractors: Vec<Word> = self
            .pool
            .iter()
            .filter(|word| word.id != question.id)
            .cloned()
            .collect();
        distractors.shuffle(&mut self.rng);
        distractors.truncate(OPTION_COUNT - 1);

        let mut options = distractors;
        options.push(question);
        options.shuffle(&mut self.rng);
        self.options = options;
    }
}
