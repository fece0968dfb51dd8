use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Card-selection strategy a player commits to for one turn.
///
/// The concrete card depends on whether the player acts first or second;
/// see [`Hand::play`](crate::Hand::play) for the resolution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Action {
    /// Play low when leading; try to bust the opponent's card when following.
    SmallSpoil = 0,
    /// Play the middle card of the hand.
    Median = 1,
    /// Play high when leading; play the largest card that still deals when following.
    LargeMax = 2,
}

impl Distribution<Action> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        match rng.random_range(0..Action::LEN) {
            0 => Action::SmallSpoil,
            1 => Action::Median,
            _ => Action::LargeMax,
        }
    }
}

impl Action {
    /// Number of actions (3).
    pub const LEN: usize = 3;

    /// All actions in code order.
    pub const ALL: [Self; Self::LEN] = [Self::SmallSpoil, Self::Median, Self::LargeMax];

    /// Returns the numeric action code used by the compact automaton format.
    #[must_use]
    pub const fn code(self) -> usize {
        self as usize
    }

    /// Converts an action code back into an action.
    ///
    /// # Examples
    ///
    /// ```
    /// use dollar_engine::Action;
    ///
    /// assert_eq!(Action::from_code(2), Some(Action::LargeMax));
    /// assert_eq!(Action::from_code(3), None);
    /// ```
    #[must_use]
    pub const fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Self::SmallSpoil),
            1 => Some(Self::Median),
            2 => Some(Self::LargeMax),
            _ => None,
        }
    }

    /// Short label used in human-readable automaton dumps.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SmallSpoil => "SmlSpl",
            Self::Median => "Median",
            Self::LargeMax => "LrgMax",
        }
    }
}
