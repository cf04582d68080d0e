//! Flip-card study session engine.
//!
//! The session is an explicit state object driven by discrete operations.
//! Exactly one caller drives a session; the WebSocket adapter owns one per
//! connection. Randomness comes from an injected [`Rng`] so shuffles are
//! deterministic under test.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{Word, WordId};

/// Horizontal displacement (in client units) required to register a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Which subset of the deck is being studied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Every card in the deck.
    All,
    /// Only cards already marked remembered.
    Remembered,
    /// Only cards still to learn.
    Review,
}

/// Presentation order of the working list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderMode {
    /// Deck order as loaded.
    Sequential,
    /// Fisher-Yates shuffle on every rebuild.
    Shuffled,
}

/// Which side of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    Front,
    Back,
}

/// Navigation direction through the working list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Progress mutation to hand to the storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RememberedUpdate {
    pub word_id: WordId,
    pub remembered: bool,
}

/// Map a completed swipe displacement to a navigation direction.
///
/// Displacement is end position minus start position, so a leftward swipe is
/// negative and advances. Movements at or under [`MIN_SWIPE_DISTANCE`] are
/// taps, not swipes.
pub fn swipe_direction(delta: f64) -> Option<Direction> {
    if delta < -MIN_SWIPE_DISTANCE {
        Some(Direction::Next)
    } else if delta > MIN_SWIPE_DISTANCE {
        Some(Direction::Prev)
    } else {
        None
    }
}

/// Select the cards matching the filter, preserving deck order.
pub fn derive_working_list(full: &[Word], filter: FilterMode) -> Vec<Word> {
    full.iter()
        .filter(|word| match filter {
            FilterMode::All => true,
            FilterMode::Remembered => word.remembered,
            FilterMode::Review => !word.remembered,
        })
        .cloned()
        .collect()
}

/// One learner's flip-card session over a loaded deck.
///
/// New sessions default to reviewing unremembered cards in shuffled order.
#[derive(Debug)]
pub struct StudySession<R: Rng> {
    full: Vec<Word>,
    filter: FilterMode,
    order: OrderMode,
    working: Vec<Word>,
    cursor: usize,
    face: CardFace,
    rng: R,
}

impl<R: Rng> StudySession<R> {
    /// Start a session over the given deck.
    pub fn new(deck: Vec<Word>, rng: R) -> Self {
        let mut session = Self {
            full: deck,
            filter: FilterMode::Review,
            order: OrderMode::Shuffled,
            working: Vec::new(),
            cursor: 0,
            face: CardFace::Front,
            rng,
        };
        session.rebuild();
        session
    }

    /// Active filter mode.
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Active order mode.
    pub fn order(&self) -> OrderMode {
        self.order
    }

    /// The card currently showing, if any.
    pub fn current(&self) -> Option<&Word> {
        self.working.get(self.cursor)
    }

    /// Which face of the current card is showing.
    pub fn face(&self) -> CardFace {
        self.face
    }

    /// Zero-based position of the cursor in the working list.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Number of cards in the working list.
    pub fn total(&self) -> usize {
        self.working.len()
    }

    /// True when the filter selects no cards.
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Switch filter mode and rebuild the working list.
    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
        self.rebuild();
    }

    /// Switch order mode and rebuild the working list.
    pub fn set_order(&mut self, order: OrderMode) {
        self.order = order;
        self.rebuild();
    }

    /// Replace the deck, e.g. after a storage refresh or set change.
    pub fn replace_deck(&mut self, deck: Vec<Word>) {
        self.full = deck;
        self.rebuild();
    }

    /// Move through the working list with wraparound. No-op on an empty list.
    pub fn advance(&mut self, direction: Direction) {
        let len = self.working.len();
        if len == 0 {
            return;
        }
        self.cursor = match direction {
            Direction::Next => (self.cursor + 1) % len,
            Direction::Prev => (self.cursor + len - 1) % len,
        };
        self.face = CardFace::Front;
    }

    /// Toggle the visible face of the current card.
    pub fn flip(&mut self) {
        if self.working.is_empty() {
            return;
        }
        self.face = match self.face {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        };
    }

    /// Interpret a swipe displacement, advancing when it clears the threshold.
    pub fn swipe(&mut self, delta: f64) {
        if let Some(direction) = swipe_direction(delta) {
            self.advance(direction);
        }
    }

    /// Toggle the remembered flag of the current card.
    ///
    /// Returns the progress update to persist. Under a non-`All` filter the
    /// toggled card no longer matches and is removed from the working list;
    /// a cursor that falls off the end snaps back to the first card.
    pub fn mark_remembered(&mut self) -> Option<RememberedUpdate> {
        let current = self.working.get(self.cursor)?;
        let word_id = current.id;
        let remembered = !current.remembered;

        if let Some(word) = self.full.iter_mut().find(|word| word.id == word_id) {
            word.remembered = remembered;
        }

        match self.filter {
            FilterMode::All => {
                if let Some(word) = self.working.get_mut(self.cursor) {
                    word.remembered = remembered;
                }
            }
            FilterMode::Remembered | FilterMode::Review => {
                self.working.remove(self.cursor);
                if self.cursor >= self.working.len() {
                    self.cursor = 0;
                }
            }
        }
        self.face = CardFace::Front;

        Some(RememberedUpdate {
            word_id,
            remembered,
        })
    }

    fn rebuild(&mut self) {
        self.working = derive_working_list(&self.full, self.filter);
        if self.order == OrderMode::Shuffled {
            self.working.shuffle(&mut self.rng);
        }
        self.cursor = 0;
        self.face = CardFace::Front;
    }
}
