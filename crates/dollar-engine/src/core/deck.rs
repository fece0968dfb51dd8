use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

/// Number of copies of one card value in a deck.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CardCount {
    /// Face value of the card, in `(0.0, 1.0]`.
    pub value: f32,
    /// Number of copies in a full deck.
    pub count: usize,
}

/// The multiset of card values a deck is built from.
///
/// The default composition is 16 × 0.25, 28 × 0.50 and 16 × 0.75 (60 cards).
///
/// # Example
///
/// ```
/// use dollar_engine::DeckComposition;
///
/// let composition = DeckComposition::default();
/// assert_eq!(composition.deck_size(), 60);
/// assert_eq!(composition.cards().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DeckComposition {
    cards: Vec<CardCount>,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self::new([(0.25, 16), (0.50, 28), (0.75, 16)])
    }
}

impl DeckComposition {
    /// Builds a composition from `(value, count)` pairs.
    pub fn new<I>(cards: I) -> Self
    where
        I: IntoIterator<Item = (f32, usize)>,
    {
        let cards = cards
            .into_iter()
            .map(|(value, count)| CardCount { value, count })
            .collect();
        Self { cards }
    }

    /// Returns the `(value, count)` entries of this composition.
    #[must_use]
    pub fn cards(&self) -> &[CardCount] {
        &self.cards
    }

    /// Total number of cards in a full deck.
    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.cards.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot deal {requested} cards: only {remaining} left in deck")]
pub struct DeckUnderflowError {
    pub requested: usize,
    pub remaining: usize,
}

/// A shuffled deck consumed from the top.
///
/// The card buffer is allocated once; [`Deck::shuffle`] returns every card to
/// the deck and permutes it in place, so one `Deck` can serve any number of
/// episodes.
///
/// # Example
///
/// ```
/// use dollar_engine::{Deck, DeckComposition};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let mut deck = Deck::new(&DeckComposition::default());
/// deck.shuffle(&mut rng);
///
/// let hand = deck.deal(5).unwrap().to_vec();
/// assert_eq!(hand.len(), 5);
/// assert_eq!(deck.remaining(), 55);
/// assert!(deck.deal(56).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<f32>,
    next: usize,
}

impl Deck {
    /// Creates a full, unshuffled deck (cards grouped by value).
    #[must_use]
    pub fn new(composition: &DeckComposition) -> Self {
        let mut cards = Vec::with_capacity(composition.deck_size());
        for card in composition.cards() {
            cards.extend(std::iter::repeat_n(card.value, card.count));
        }
        Self { cards, next: 0 }
    }

    /// Returns all cards to the deck and applies a uniformly random permutation.
    pub fn shuffle<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        self.next = 0;
        self.cards.shuffle(rng);
    }

    /// Number of cards not yet dealt.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Removes the top `count` cards and returns them.
    ///
    /// Fails without consuming anything if fewer than `count` cards remain.
    pub fn deal(&mut self, count: usize) -> Result<&[f32], DeckUnderflowError> {
        let remaining = self.remaining();
        if remaining < count {
            return Err(DeckUnderflowError {
                requested: count,
                remaining,
            });
        }
        let start = self.next;
        self.next += count;
        Ok(&self.cards[start..self.next])
    }

    /// Removes the top card, or returns `None` when the deck is exhausted.
    pub fn draw(&mut self) -> Option<f32> {
        let card = *self.cards.get(self.next)?;
        self.next += 1;
        Some(card)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn sorted(mut cards: Vec<f32>) -> Vec<f32> {
        cards.sort_by(f32::total_cmp);
        cards
    }

    #[test]
    fn test_new_deck_matches_composition() {
        let deck = Deck::new(&DeckComposition::default());
        assert_eq!(deck.cards.len(), 60);
        let count = |v: f32| deck.cards.iter().filter(|c| **c == v).count();
        assert_eq!(count(0.25), 16);
        assert_eq!(count(0.50), 28);
        assert_eq!(count(0.75), 16);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(42);
        let original = Deck::new(&DeckComposition::default());
        let mut deck = original.clone();
        deck.shuffle(&mut rng);
        assert_eq!(sorted(deck.cards.clone()), sorted(original.cards.clone()));
    }

    #[test]
    fn test_shuffle_restores_dealt_cards() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deck = Deck::new(&DeckComposition::default());
        deck.shuffle(&mut rng);
        deck.deal(30).unwrap();
        assert_eq!(deck.remaining(), 30);
        deck.shuffle(&mut rng);
        assert_eq!(deck.remaining(), 60);
    }

    #[test]
    fn test_deal_consumes_from_top() {
        let mut deck = Deck::new(&DeckComposition::new([(0.25, 2), (0.75, 1)]));
        assert_eq!(deck.deal(2).unwrap(), &[0.25, 0.25]);
        assert_eq!(deck.draw(), Some(0.75));
        assert_eq!(deck.draw(), None);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_deal_underflow_consumes_nothing() {
        let mut deck = Deck::new(&DeckComposition::new([(0.5, 3)]));
        let err = deck.deal(4).unwrap_err();
        assert_eq!(
            err,
            DeckUnderflowError {
                requested: 4,
                remaining: 3
            }
        );
        assert_eq!(deck.remaining(), 3);
        assert_eq!(
            err.to_string(),
            "cannot deal 4 cards: only 3 left in deck"
        );
    }

    #[test]
    fn test_composition_serde_form() {
        let json = serde_json::to_string(&DeckComposition::new([(0.5, 2)])).unwrap();
        assert_eq!(json, r#"[{"value":0.5,"count":2}]"#);
        let back: DeckComposition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeckComposition::new([(0.5, 2)]));
    }
}
