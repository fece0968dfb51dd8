use std::ops::Index;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::Hand;

/// One entry of the observation vector a player sees before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Feature {
    /// Value of the opponent's card on the table, `0.0` when leading.
    CardShowing = 0,
    /// Lowest card in hand.
    HandLowest = 1,
    /// Middle card in hand.
    HandMedian = 2,
    /// Highest card in hand.
    HandHighest = 3,
    /// Fraction of rounds so far (including the current one) that ended in a deal.
    DealRatio = 4,
    /// `1.0` when acting second in this round, `0.0` otherwise.
    SecondToAct = 5,
}

impl Distribution<Feature> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Feature {
        match rng.random_range(0..Feature::LEN) {
            0 => Feature::CardShowing,
            1 => Feature::HandLowest,
            2 => Feature::HandMedian,
            3 => Feature::HandHighest,
            4 => Feature::DealRatio,
            _ => Feature::SecondToAct,
        }
    }
}

impl Feature {
    /// Number of observation features (6).
    pub const LEN: usize = 6;

    pub const ALL: [Self; Self::LEN] = [
        Self::CardShowing,
        Self::HandLowest,
        Self::HandMedian,
        Self::HandHighest,
        Self::DealRatio,
        Self::SecondToAct,
    ];

    /// Position of this feature in the observation vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Short label used in human-readable automaton dumps.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardShowing => "Ttl",
            Self::HandLowest => "Sml",
            Self::HandMedian => "Med",
            Self::HandHighest => "Lrg",
            Self::DealRatio => "Coop",
            Self::SecondToAct => "Idx",
        }
    }
}

/// The observation vector presented to a [`Policy`](crate::Policy).
///
/// Layout: `[card_showing, hand_lowest, hand_median, hand_highest, deal_ratio, second_to_act]`.
///
/// # Example
///
/// ```
/// use dollar_engine::{Feature, Hand, Observation};
///
/// let hand = Hand::from_cards(&[0.25, 0.5, 0.5, 0.75, 0.75]);
/// let obs = Observation::from_hand(Some(0.5), &hand, 1, 4);
///
/// assert_eq!(obs[Feature::CardShowing], 0.5);
/// assert_eq!(obs[Feature::HandMedian], 0.5);
/// assert_eq!(obs[Feature::DealRatio], 0.25);
/// assert_eq!(obs[Feature::SecondToAct], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation([f32; Feature::LEN]);

impl Observation {
    #[must_use]
    pub const fn new(values: [f32; Feature::LEN]) -> Self {
        Self(values)
    }

    /// Builds the observation for a player holding `hand`.
    ///
    /// `showing` is `None` for the player leading the round. `rounds_played`
    /// counts the current round, so it is at least 1 during play.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_hand(showing: Option<f32>, hand: &Hand, deals: usize, rounds_played: usize) -> Self {
        debug_assert!(rounds_played > 0);
        Self([
            showing.unwrap_or(0.0),
            hand.lowest().unwrap_or(0.0),
            hand.median().unwrap_or(0.0),
            hand.highest().unwrap_or(0.0),
            deals as f32 / rounds_played as f32,
            if showing.is_some() { 1.0 } else { 0.0 },
        ])
    }

    #[must_use]
    pub const fn values(&self) -> &[f32; Feature::LEN] {
        &self.0
    }
}

impl Index<Feature> for Observation {
    type Output = f32;

    fn index(&self, feature: Feature) -> &Self::Output {
        &self.0[feature.index()]
    }
}
