use std::ops::Range;

use dollar_engine::{Action, Observation, Policy};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    codec::{InvalidAutomatonError, StateRecord},
    state::{State, StateField},
};

/// Number of failed tests the interpreter tolerates before settling on the
/// "false" branch of the state it stopped on.
pub const MAX_TRANSITIONS: usize = 5;

/// A behavioral decision automaton: a fixed-size state machine mapping
/// observations to actions.
///
/// # Interpreter
///
/// [`Automaton::run`] starts from the current state and repeatedly applies
/// that state's test. A failing test follows the state's `on_false`
/// transition; a passing test stops the search. After at most
/// `MAX_TRANSITIONS + 1` tests the automaton plays the action of the branch
/// selected on the state it stopped on and then follows that same branch's
/// transition, so the next call within a game starts one state further on.
///
/// # Example
///
/// ```
/// use dollar_automaton::Automaton;
/// use dollar_engine::Observation;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let mut automaton = Automaton::random(8, &mut rng);
///
/// automaton.reset();
/// let obs = Observation::new([0.0, 0.25, 0.5, 0.75, 0.0, 0.0]);
/// let _action = automaton.run(&obs);
/// assert!(automaton.current_state() < automaton.num_states());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<StateRecord>", into = "Vec<StateRecord>")]
pub struct Automaton {
    states: Vec<State>,
    current_state: usize,
}

/// Location of a single-field change made by [`Automaton::mutate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub state: usize,
    pub field: StateField,
}

impl Automaton {
    /// Creates an automaton of `num_states` default states.
    ///
    /// # Panics
    ///
    /// Panics if `num_states` is zero.
    #[must_use]
    pub fn new(num_states: usize) -> Self {
        assert!(num_states > 0, "an automaton needs at least one state");
        Self {
            states: vec![State::default(); num_states],
            current_state: 0,
        }
    }

    /// Creates an automaton of `num_states` uniformly random states.
    #[must_use]
    pub fn random<R>(num_states: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut automaton = Self::new(num_states);
        automaton.randomize(rng);
        automaton
    }

    /// Builds an automaton from explicit states, checking every transition and
    /// threshold.
    pub fn from_states(states: Vec<State>) -> Result<Self, InvalidAutomatonError> {
        if states.is_empty() {
            return Err(InvalidAutomatonError::Empty);
        }
        let num_states = states.len();
        for (index, state) in states.iter().enumerate() {
            for (field, transition) in [
                (StateField::TransitionOnFalse, state.on_false.transition),
                (StateField::TransitionOnTrue, state.on_true.transition),
            ] {
                if transition >= num_states {
                    return Err(InvalidAutomatonError::CodeOutOfRange {
                        state: index,
                        field,
                        code: transition,
                        limit: num_states,
                    });
                }
            }
            if !(0.0..=1.0).contains(&state.threshold) {
                return Err(InvalidAutomatonError::ThresholdOutOfRange {
                    state: index,
                    threshold: state.threshold,
                });
            }
        }
        Ok(Self {
            states,
            current_state: 0,
        })
    }

    #[must_use]
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    #[must_use]
    pub fn current_state(&self) -> usize {
        self.current_state
    }

    /// Re-samples every field of every state.
    pub fn randomize<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let num_states = self.states.len();
        for state in &mut self.states {
            *state = State::random(rng, num_states);
        }
    }

    /// Returns to state 0. Called before every game.
    pub fn reset(&mut self) {
        self.current_state = 0;
    }

    /// Runs the interpreter on `observation` and returns the chosen action.
    pub fn run(&mut self, observation: &Observation) -> Action {
        let mut outcome = false;
        let mut steps = 0;
        while steps <= MAX_TRANSITIONS {
            let state = &self.states[self.current_state];
            if state.test(observation) {
                outcome = true;
                break;
            }
            self.current_state = state.on_false.transition;
            steps += 1;
        }

        let branch = *self.states[self.current_state].branch(outcome);
        debug_assert!(branch.transition < self.states.len());
        self.current_state = branch.transition;
        branch.action
    }

    /// Two-point crossover: swaps every state in a random index range `[lo, hi)`
    /// with `other`.
    ///
    /// Both endpoints are drawn from `0..num_states`, so the last state is
    /// never exchanged and equal endpoints leave both automata unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the automata have different sizes.
    pub fn crossover<R>(&mut self, other: &mut Self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let a = rng.random_range(0..self.states.len());
        let b = rng.random_range(0..self.states.len());
        self.crossover_range(other, a.min(b)..a.max(b));
    }

    /// Swaps the states in `range` with `other`.
    ///
    /// # Panics
    ///
    /// Panics if the automata have different sizes or the range is out of bounds.
    pub fn crossover_range(&mut self, other: &mut Self, range: Range<usize>) {
        assert_eq!(
            self.states.len(),
            other.states.len(),
            "crossover requires automata of equal size"
        );
        self.states[range.clone()].swap_with_slice(&mut other.states[range]);
    }

    /// Replaces one randomly chosen field of one randomly chosen state.
    pub fn mutate<R>(&mut self, rng: &mut R) -> Mutation
    where
        R: Rng + ?Sized,
    {
        let num_states = self.states.len();
        let state = rng.random_range(0..num_states);
        let field = rng.random();
        self.states[state].resample(field, rng, num_states);
        Mutation { state, field }
    }
}

impl Policy for Automaton {
    fn reset(&mut self) {
        Automaton::reset(self);
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        self.run(observation)
    }
}

#[cfg(test)]
mod tests {
    use dollar_engine::Feature;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::state::{Branch, Comparison};

    fn branch(transition: usize, action: Action) -> Branch {
        Branch { transition, action }
    }

    /// A state whose test never holds.
    fn never(on_false: Branch) -> State {
        State {
            feature: Feature::CardShowing,
            comparison: Comparison::GreaterThan,
            threshold: 1.0,
            on_false,
            on_true: branch(0, Action::LargeMax),
        }
    }

    /// A state whose test always holds for in-range observations.
    fn always(on_true: Branch) -> State {
        State {
            feature: Feature::CardShowing,
            comparison: Comparison::LessThan,
            threshold: 1.0,
            on_false: branch(0, Action::SmallSpoil),
            on_true,
        }
    }

    fn obs() -> Observation {
        Observation::new([0.5, 0.25, 0.5, 0.75, 0.5, 1.0])
    }

    #[test]
    fn test_run_takes_true_branch_and_advances() {
        let mut automaton = Automaton::from_states(vec![
            always(branch(2, Action::Median)),
            never(branch(0, Action::SmallSpoil)),
            always(branch(1, Action::LargeMax)),
        ])
        .unwrap();

        assert_eq!(automaton.run(&obs()), Action::Median);
        assert_eq!(automaton.current_state(), 2);
        assert_eq!(automaton.run(&obs()), Action::LargeMax);
        assert_eq!(automaton.current_state(), 1);
    }

    #[test]
    fn test_run_follows_false_transitions_then_double_advances() {
        // 0 fails -> 1 fails -> 2 holds: play 2's true action, then move to 2's true target.
        let mut automaton = Automaton::from_states(vec![
            never(branch(1, Action::SmallSpoil)),
            never(branch(2, Action::SmallSpoil)),
            always(branch(3, Action::LargeMax)),
            always(branch(0, Action::Median)),
        ])
        .unwrap();

        assert_eq!(automaton.run(&obs()), Action::LargeMax);
        assert_eq!(automaton.current_state(), 3);
    }

    #[test]
    fn test_run_stalls_after_max_transitions() {
        // A ring of failing states: after MAX_TRANSITIONS + 1 failed tests the
        // interpreter plays the false action of the state it is parked on.
        let states = (0..8)
            .map(|i| {
                let action = Action::ALL[i % Action::LEN];
                never(branch((i + 1) % 8, action))
            })
            .collect();
        let mut automaton = Automaton::from_states(states).unwrap();

        // Six failed tests move 0 -> 6; the false branch of 6 is then taken.
        let action = automaton.run(&obs());
        assert_eq!(action, Action::ALL[6 % Action::LEN]);
        assert_eq!(automaton.current_state(), 7);
    }

    #[test]
    fn test_run_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(17);
        for _ in 0..50 {
            let mut automaton = Automaton::random(6, &mut rng);
            automaton.reset();
            for _ in 0..100 {
                let values = std::array::from_fn(|_| rng.random_range(0.0..=1.0));
                let action = automaton.run(&Observation::new(values));
                assert!(action.code() < Action::LEN);
                assert!(automaton.current_state() < automaton.num_states());
            }
        }
    }

    #[test]
    fn test_reset_returns_to_first_state() {
        let mut automaton = Automaton::from_states(vec![
            always(branch(1, Action::Median)),
            always(branch(1, Action::Median)),
        ])
        .unwrap();
        automaton.run(&obs());
        assert_eq!(automaton.current_state(), 1);
        automaton.reset();
        assert_eq!(automaton.current_state(), 0);
    }

    #[test]
    fn test_crossover_empty_range_is_noop() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut a = Automaton::random(8, &mut rng);
        let mut b = Automaton::random(8, &mut rng);
        let (a0, b0) = (a.clone(), b.clone());
        a.crossover_range(&mut b, 3..3);
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_crossover_range_swaps_exactly_inside() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut a = Automaton::random(8, &mut rng);
        let mut b = Automaton::random(8, &mut rng);
        let (a0, b0) = (a.clone(), b.clone());
        a.crossover_range(&mut b, 2..5);
        for i in 0..8 {
            if (2..5).contains(&i) {
                assert_eq!(a.states[i], b0.states[i]);
                assert_eq!(b.states[i], a0.states[i]);
            } else {
                assert_eq!(a.states[i], a0.states[i]);
                assert_eq!(b.states[i], b0.states[i]);
            }
        }
    }

    #[test]
    fn test_random_crossover_preserves_state_multiset() {
        let mut rng = Pcg32::seed_from_u64(6);
        for _ in 0..50 {
            let mut a = Automaton::random(5, &mut rng);
            let mut b = Automaton::random(5, &mut rng);
            let (a0, b0) = (a.clone(), b.clone());
            a.crossover(&mut b, &mut rng);
            for i in 0..5 {
                let swapped = a.states[i] == b0.states[i] && b.states[i] == a0.states[i];
                let kept = a.states[i] == a0.states[i] && b.states[i] == b0.states[i];
                assert!(swapped || kept);
            }
            // The last index is never part of the exchanged range.
            assert_eq!(a.states[4], a0.states[4]);
        }
    }

    #[test]
    #[should_panic(expected = "equal size")]
    fn test_crossover_size_mismatch_panics() {
        let mut a = Automaton::new(3);
        let mut b = Automaton::new(4);
        a.crossover_range(&mut b, 0..1);
    }

    #[test]
    fn test_mutate_changes_one_field_of_one_state() {
        let mut rng = Pcg32::seed_from_u64(8);
        for _ in 0..200 {
            let mut automaton = Automaton::random(8, &mut rng);
            let before = automaton.clone();
            let Mutation { state, .. } = automaton.mutate(&mut rng);
            for i in 0..8 {
                if i != state {
                    assert_eq!(automaton.states[i], before.states[i]);
                }
            }
            let changed = changed_fields(&before.states[state], &automaton.states[state]);
            assert!(changed <= 1, "{changed} fields changed");
            assert!(automaton.states[state].on_false.transition < 8);
            assert!(automaton.states[state].on_true.transition < 8);
        }
    }

    fn changed_fields(a: &State, b: &State) -> usize {
        [
            a.feature != b.feature,
            a.comparison != b.comparison,
            a.threshold.to_bits() != b.threshold.to_bits(),
            a.on_false.transition != b.on_false.transition,
            a.on_true.transition != b.on_true.transition,
            a.on_false.action != b.on_false.action,
            a.on_true.action != b.on_true.action,
        ]
        .into_iter()
        .filter(|c| *c)
        .count()
    }

    #[test]
    fn test_from_states_rejects_dangling_transition() {
        let err = Automaton::from_states(vec![always(branch(1, Action::Median))]).unwrap_err();
        assert_eq!(
            err,
            InvalidAutomatonError::CodeOutOfRange {
                state: 0,
                field: StateField::TransitionOnTrue,
                code: 1,
                limit: 1
            }
        );
        assert_eq!(
            Automaton::from_states(Vec::new()).unwrap_err(),
            InvalidAutomatonError::Empty
        );
    }

    #[test]
    fn test_automaton_as_policy() {
        let mut automaton = Automaton::from_states(vec![always(branch(0, Action::LargeMax))]).unwrap();
        let policy: &mut dyn Policy = &mut automaton;
        policy.reset();
        assert_eq!(policy.choose_action(&obs()), Action::LargeMax);
    }
}
