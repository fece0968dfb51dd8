use serde::{Deserialize, Serialize};

use crate::{DeckComposition, MAX_HAND_SIZE};

/// Number of players at the table.
pub const NUM_PLAYERS: usize = 2;

/// Static parameters of the card game.
///
/// # Example
///
/// ```
/// use dollar_engine::GameRules;
///
/// let rules = GameRules::default();
/// rules.validate().unwrap();
/// // 1 + (60 - 2 * 5) / 2
/// assert_eq!(rules.num_rounds(), 26);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameRules {
    /// Cards the deck is built from.
    pub deck: DeckComposition,
    /// Cards held by each player; must be odd.
    pub hand_size: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            deck: DeckComposition::default(),
            hand_size: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RulesError {
    #[display("deck composition has no cards")]
    EmptyDeck,
    #[display("card value must be positive and finite, got {value}")]
    InvalidCardValue { value: f32 },
    #[display("hand size must be odd, got {hand_size}")]
    EvenHandSize { hand_size: usize },
    #[display("hand size {hand_size} exceeds the maximum of {max}")]
    HandTooLarge { hand_size: usize, max: usize },
    #[display("deck of {deck_size} cards cannot deal {required} opening cards")]
    DeckTooSmall { deck_size: usize, required: usize },
}

impl GameRules {
    /// Checks that a game can be played with these rules.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.deck.deck_size() == 0 {
            return Err(RulesError::EmptyDeck);
        }
        if let Some(card) = self
            .deck
            .cards()
            .iter()
            .find(|c| !(c.value.is_finite() && c.value > 0.0))
        {
            return Err(RulesError::InvalidCardValue { value: card.value });
        }
        if self.hand_size % 2 == 0 {
            return Err(RulesError::EvenHandSize {
                hand_size: self.hand_size,
            });
        }
        if self.hand_size > MAX_HAND_SIZE {
            return Err(RulesError::HandTooLarge {
                hand_size: self.hand_size,
                max: MAX_HAND_SIZE,
            });
        }
        let required = NUM_PLAYERS * self.hand_size;
        if self.deck.deck_size() < required {
            return Err(RulesError::DeckTooSmall {
                deck_size: self.deck.deck_size(),
                required,
            });
        }
        Ok(())
    }

    /// Rounds in one game: play continues until the deck can no longer refill
    /// both hands.
    #[must_use]
    pub fn num_rounds(&self) -> usize {
        let undealt = self
            .deck
            .deck_size()
            .saturating_sub(NUM_PLAYERS * self.hand_size);
        1 + undealt / NUM_PLAYERS
    }
}
