use dollar_engine::{Action, Feature, Observation};
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Tolerance of the [`Comparison::Near`] test.
pub const NEAR: f32 = 0.05;

/// Thresholds are drawn from the grid `k / THRESHOLD_STEPS`, `k` in `0..=THRESHOLD_STEPS`.
pub const THRESHOLD_STEPS: u16 = 1000;

/// How a state compares its observed feature against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum Comparison {
    /// `value > threshold`
    GreaterThan = 0,
    /// `value < threshold`
    LessThan = 1,
    /// `|value - threshold| < NEAR`
    Near = 2,
}

impl Distribution<Comparison> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Comparison {
        match rng.random_range(0..Comparison::LEN) {
            0 => Comparison::GreaterThan,
            1 => Comparison::LessThan,
            _ => Comparison::Near,
        }
    }
}

impl Comparison {
    /// Number of comparison kinds (3).
    pub const LEN: usize = 3;

    #[must_use]
    pub const fn code(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Self::GreaterThan),
            1 => Some(Self::LessThan),
            2 => Some(Self::Near),
            _ => None,
        }
    }

    /// Operator label used in human-readable dumps.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Near => "near",
        }
    }

    /// Evaluates the comparison.
    ///
    /// # Examples
    ///
    /// ```
    /// use dollar_automaton::Comparison;
    ///
    /// assert!(Comparison::GreaterThan.holds(0.75, 0.5));
    /// assert!(!Comparison::LessThan.holds(0.5, 0.5));
    /// assert!(Comparison::Near.holds(0.52, 0.5));
    /// assert!(!Comparison::Near.holds(0.6, 0.5));
    /// ```
    #[must_use]
    pub fn holds(self, value: f32, threshold: f32) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThan => value < threshold,
            Self::Near => (value - threshold).abs() < NEAR,
        }
    }
}

/// Where a state goes, and what it plays, for one outcome of its test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Branch {
    /// Index of the next state.
    pub transition: usize,
    /// Action played when this branch is taken.
    pub action: Action,
}

impl Branch {
    fn random<R>(rng: &mut R, num_states: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            transition: rng.random_range(0..num_states),
            action: rng.random(),
        }
    }
}

/// One node of an automaton: a threshold test on a single observation feature
/// and a branch for each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct State {
    /// Observation feature inspected by the test.
    pub feature: Feature,
    pub comparison: Comparison,
    /// Threshold in `[0.0, 1.0]`.
    pub threshold: f32,
    /// Taken when the test fails.
    pub on_false: Branch,
    /// Taken when the test holds.
    pub on_true: Branch,
}

impl Default for State {
    fn default() -> Self {
        let branch = Branch {
            transition: 0,
            action: Action::SmallSpoil,
        };
        Self {
            feature: Feature::CardShowing,
            comparison: Comparison::GreaterThan,
            threshold: 0.5,
            on_false: branch,
            on_true: branch,
        }
    }
}

impl State {
    /// Samples every field independently and uniformly within its range.
    pub fn random<R>(rng: &mut R, num_states: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let feature = rng.random();
        let comparison = rng.random();
        let threshold = random_threshold(rng);
        let on_true = Branch::random(rng, num_states);
        let on_false = Branch::random(rng, num_states);
        Self {
            feature,
            comparison,
            threshold,
            on_false,
            on_true,
        }
    }

    /// Evaluates this state's test against `observation`.
    #[must_use]
    pub fn test(&self, observation: &Observation) -> bool {
        self.comparison
            .holds(observation[self.feature], self.threshold)
    }

    #[must_use]
    pub fn branch(&self, outcome: bool) -> &Branch {
        if outcome { &self.on_true } else { &self.on_false }
    }

    /// Replaces `field` with a freshly sampled valid value.
    pub fn resample<R>(&mut self, field: StateField, rng: &mut R, num_states: usize)
    where
        R: Rng + ?Sized,
    {
        match field {
            StateField::Feature => self.feature = rng.random(),
            StateField::Comparison => self.comparison = rng.random(),
            StateField::Threshold => self.threshold = random_threshold(rng),
            StateField::TransitionOnFalse => {
                self.on_false.transition = rng.random_range(0..num_states);
            }
            StateField::TransitionOnTrue => {
                self.on_true.transition = rng.random_range(0..num_states);
            }
            StateField::ActionOnFalse => self.on_false.action = rng.random(),
            StateField::ActionOnTrue => self.on_true.action = rng.random(),
        }
    }
}

/// Samples a threshold from the `k / 1000` grid.
pub fn random_threshold<R>(rng: &mut R) -> f32
where
    R: Rng + ?Sized,
{
    f32::from(rng.random_range(0..=THRESHOLD_STEPS)) / f32::from(THRESHOLD_STEPS)
}

/// The independently mutable fields of a [`State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StateField {
    #[display("decision index")]
    Feature,
    #[display("decision type")]
    Comparison,
    #[display("threshold")]
    Threshold,
    #[display("transition on false")]
    TransitionOnFalse,
    #[display("transition on true")]
    TransitionOnTrue,
    #[display("action on false")]
    ActionOnFalse,
    #[display("action on true")]
    ActionOnTrue,
}

impl Distribution<StateField> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> StateField {
        match rng.random_range(0..StateField::LEN) {
            0 => StateField::Feature,
            1 => StateField::Comparison,
            2 => StateField::Threshold,
            3 => StateField::TransitionOnFalse,
            4 => StateField::TransitionOnTrue,
            5 => StateField::ActionOnFalse,
            _ => StateField::ActionOnTrue,
        }
    }
}

impl StateField {
    /// Number of mutable fields (7).
    pub const LEN: usize = 7;
}
