use arrayvec::ArrayVec;

use super::{DEAL_LIMIT, action::Action};

/// Largest hand size supported by [`Hand`].
pub const MAX_HAND_SIZE: usize = 15;

/// A player's cards, kept sorted in ascending order.
///
/// Backed by a fixed-capacity buffer so a hand can be refilled every round and
/// reused across episodes without touching the heap.
///
/// # Example
///
/// ```
/// use dollar_engine::{Action, Hand};
///
/// let mut hand = Hand::from_cards(&[0.5, 0.25, 0.75, 0.25, 0.5]);
/// assert_eq!(hand.cards(), &[0.25, 0.25, 0.5, 0.5, 0.75]);
///
/// // Leading with `LargeMax` plays the highest card.
/// assert_eq!(hand.play(Action::LargeMax, None), 0.75);
/// assert_eq!(hand.cards(), &[0.25, 0.25, 0.5, 0.5]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hand {
    cards: ArrayVec<f32, MAX_HAND_SIZE>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hand holding `cards`, sorted.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_HAND_SIZE`] cards are given.
    #[must_use]
    pub fn from_cards(cards: &[f32]) -> Self {
        let mut hand = Self::new();
        hand.pick_up_all(cards);
        hand
    }

    /// Cards in ascending order.
    #[must_use]
    pub fn cards(&self) -> &[f32] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Inserts a card at its sorted position.
    ///
    /// # Panics
    ///
    /// Panics if the hand already holds [`MAX_HAND_SIZE`] cards.
    pub fn pick_up(&mut self, card: f32) {
        let index = self.cards.partition_point(|c| *c <= card);
        self.cards.insert(index, card);
    }

    /// Inserts every card of `cards`.
    pub fn pick_up_all(&mut self, cards: &[f32]) {
        for &card in cards {
            self.pick_up(card);
        }
    }

    #[must_use]
    pub fn lowest(&self) -> Option<f32> {
        self.cards.first().copied()
    }

    /// The card at index `len / 2`.
    #[must_use]
    pub fn median(&self) -> Option<f32> {
        self.cards.get(self.cards.len() / 2).copied()
    }

    #[must_use]
    pub fn highest(&self) -> Option<f32> {
        self.cards.last().copied()
    }

    /// Chooses which card `action` plays, returning its index in the hand.
    ///
    /// `showing` is the opponent's card when following, `None` when leading.
    ///
    /// Leading: `SmallSpoil` plays the lowest card, `LargeMax` the highest and
    /// `Median` the middle one.
    ///
    /// Following: `SmallSpoil` plays the lowest card that pushes the total over
    /// [`DEAL_LIMIT`] (or the highest card if none can), `LargeMax` plays the
    /// highest card that keeps the total within the limit (or the lowest card if
    /// none can), and `Median` plays the middle card.
    ///
    /// # Panics
    ///
    /// Panics if the hand is empty.
    #[must_use]
    pub fn select(&self, action: Action, showing: Option<f32>) -> usize {
        assert!(!self.cards.is_empty(), "cannot play from an empty hand");
        let last = self.cards.len() - 1;
        let middle = self.cards.len() / 2;
        match (showing, action) {
            (_, Action::Median) => middle,
            (None, Action::SmallSpoil) => 0,
            (None, Action::LargeMax) => last,
            (Some(showing), Action::SmallSpoil) => self
                .cards
                .iter()
                .position(|c| c + showing > DEAL_LIMIT)
                .unwrap_or(last),
            (Some(showing), Action::LargeMax) => self
                .cards
                .iter()
                .rposition(|c| c + showing <= DEAL_LIMIT)
                .unwrap_or(0),
        }
    }

    /// Plays the card chosen by [`Hand::select`], removing it from the hand.
    ///
    /// # Panics
    ///
    /// Panics if the hand is empty.
    pub fn play(&mut self, action: Action, showing: Option<f32>) -> f32 {
        let index = self.select(action, showing);
        self.cards.remove(index)
    }
}
