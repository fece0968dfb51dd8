use std::fmt;

use crate::automaton::Automaton;

/// Human-readable listing of an automaton, returned by [`Automaton::render`].
///
/// ```text
/// 2 states
/// 0) if(Lrg > 0.500) LrgMax-> 1 else SmlSpl-> 0
/// 1) if(Coop near 0.250) Median-> 0 else Median-> 1
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Render<'a> {
    automaton: &'a Automaton,
}

impl fmt::Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} states", self.automaton.num_states())?;
        for (i, state) in self.automaton.states().iter().enumerate() {
            writeln!(
                f,
                "{i}) if({} {} {:.3}) {}-> {} else {}-> {}",
                state.feature.label(),
                state.comparison.symbol(),
                state.threshold,
                state.on_true.action.label(),
                state.on_true.transition,
                state.on_false.action.label(),
                state.on_false.transition,
            )?;
        }
        Ok(())
    }
}

impl Automaton {
    /// Renders each state as a conditional-branch pseudocode line.
    #[must_use]
    pub fn render(&self) -> Render<'_> {
        Render { automaton: self }
    }
}
