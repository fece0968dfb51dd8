use crate::{Action, Observation};

/// Anything that can choose an action from an observation.
///
/// The game drives players exclusively through this trait, so evolved automata
/// and hand-written strategies are interchangeable at the table.
pub trait Policy {
    /// Prepares for a new game. Called once per player before the first round.
    fn reset(&mut self);

    /// Chooses the action for the current turn.
    fn choose_action(&mut self, observation: &Observation) -> Action;
}

impl<P> Policy for &mut P
where
    P: Policy + ?Sized,
{
    fn reset(&mut self) {
        (**self).reset();
    }

    fn choose_action(&mut self, observation: &Observation) -> Action {
        (**self).choose_action(observation)
    }
}

/// A policy that always plays the same action.
///
/// # Example
///
/// ```
/// use dollar_engine::{Action, FixedPolicy, Observation, Policy as _};
///
/// let mut policy = FixedPolicy(Action::Median);
/// let obs = Observation::new([0.0; 6]);
/// assert_eq!(policy.choose_action(&obs), Action::Median);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub Action);

impl Policy for FixedPolicy {
    fn reset(&mut self) {}

    fn choose_action(&mut self, _observation: &Observation) -> Action {
        self.0
    }
}
