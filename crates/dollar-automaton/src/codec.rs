//! Compact text form of an automaton.
//!
//! Each state becomes one line of seven space-separated fields:
//!
//! ```text
//! decision_index decision_type threshold action_false transition_false action_true transition_true
//! ```
//!
//! with the threshold written to three decimals. The branch that fires when
//! the test fails comes first; files that list the taken branch first load
//! with their branches swapped. Blank lines are ignored when
//! parsing, so several automata can share a file separated by blank lines.

use std::{fmt, str::FromStr};

use dollar_engine::{Action, Feature};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::Automaton,
    state::{Branch, Comparison, State, StateField},
};

/// Numeric form of one state, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StateRecord {
    pub decision_index: usize,
    pub decision_type: usize,
    pub threshold: f32,
    pub action_false: usize,
    pub transition_false: usize,
    pub action_true: usize,
    pub transition_true: usize,
}

impl From<&State> for StateRecord {
    fn from(state: &State) -> Self {
        Self {
            decision_index: state.feature.index(),
            decision_type: state.comparison.code(),
            threshold: state.threshold,
            action_false: state.on_false.action.code(),
            transition_false: state.on_false.transition,
            action_true: state.on_true.action.code(),
            transition_true: state.on_true.transition,
        }
    }
}

impl fmt::Display for StateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.3} {} {} {} {}",
            self.decision_index,
            self.decision_type,
            self.threshold,
            self.action_false,
            self.transition_false,
            self.action_true,
            self.transition_true
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseRecordError {
    #[display("expected 7 fields, found {found}")]
    FieldCount { found: usize },
    #[display("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

const FIELD_NAMES: [&str; 7] = [
    "decision index",
    "decision type",
    "threshold",
    "action on false",
    "transition on false",
    "action on true",
    "transition on true",
];

impl FromStr for StateRecord {
    type Err = ParseRecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s.split_whitespace().collect::<Vec<_>>();
        let [di, dt, th, af, tf, at, tt] = fields[..] else {
            return Err(ParseRecordError::FieldCount {
                found: fields.len(),
            });
        };
        let int = |index: usize, value: &str| {
            value
                .parse::<usize>()
                .map_err(|_| ParseRecordError::InvalidNumber {
                    field: FIELD_NAMES[index],
                    value: value.to_owned(),
                })
        };
        let threshold = th
            .parse::<f32>()
            .map_err(|_| ParseRecordError::InvalidNumber {
                field: FIELD_NAMES[2],
                value: th.to_owned(),
            })?;
        Ok(Self {
            decision_index: int(0, di)?,
            decision_type: int(1, dt)?,
            threshold,
            action_false: int(3, af)?,
            transition_false: int(4, tf)?,
            action_true: int(5, at)?,
            transition_true: int(6, tt)?,
        })
    }
}

/// An automaton description that violates a range invariant.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidAutomatonError {
    #[display("automaton has no states")]
    Empty,
    #[display("state {state}: {field} {code} is outside 0..{limit}")]
    CodeOutOfRange {
        state: usize,
        field: StateField,
        code: usize,
        limit: usize,
    },
    #[display("state {state}: threshold {threshold} is outside [0, 1]")]
    ThresholdOutOfRange { state: usize, threshold: f32 },
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseAutomatonError {
    #[display("line {line}: {source}")]
    Record {
        line: usize,
        source: ParseRecordError,
    },
    #[display("{_0}")]
    #[from]
    Invalid(InvalidAutomatonError),
}

impl Automaton {
    /// Numeric records for every state, in order.
    #[must_use]
    pub fn to_records(&self) -> Vec<StateRecord> {
        self.states().iter().map(StateRecord::from).collect()
    }

    /// Rebuilds an automaton from numeric records, rejecting out-of-range codes.
    pub fn from_records(records: &[StateRecord]) -> Result<Self, InvalidAutomatonError> {
        let states = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let code_error = |field, code, limit| InvalidAutomatonError::CodeOutOfRange {
                    state: index,
                    field,
                    code,
                    limit,
                };
                let feature = Feature::from_index(record.decision_index).ok_or_else(|| {
                    code_error(StateField::Feature, record.decision_index, Feature::LEN)
                })?;
                let comparison = Comparison::from_code(record.decision_type).ok_or_else(|| {
                    code_error(StateField::Comparison, record.decision_type, Comparison::LEN)
                })?;
                let action_false = Action::from_code(record.action_false).ok_or_else(|| {
                    code_error(StateField::ActionOnFalse, record.action_false, Action::LEN)
                })?;
                let action_true = Action::from_code(record.action_true).ok_or_else(|| {
                    code_error(StateField::ActionOnTrue, record.action_true, Action::LEN)
                })?;
                Ok(State {
                    feature,
                    comparison,
                    threshold: record.threshold,
                    on_false: Branch {
                        transition: record.transition_false,
                        action: action_false,
                    },
                    on_true: Branch {
                        transition: record.transition_true,
                        action: action_true,
                    },
                })
            })
            .collect::<Result<Vec<_>, InvalidAutomatonError>>()?;
        Self::from_states(states)
    }

    /// Compact text form: one line per state, each terminated by `\n`.
    ///
    /// # Example
    ///
    /// ```
    /// use dollar_automaton::Automaton;
    ///
    /// let text = "0 0 0.500 0 1 2 0\n3 2 0.125 1 0 1 1\n";
    /// let automaton = Automaton::from_compact(text).unwrap();
    /// assert_eq!(automaton.num_states(), 2);
    /// assert_eq!(automaton.to_compact(), text);
    /// ```
    #[must_use]
    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        for record in self.to_records() {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    /// Parses the compact text form. Any malformed line fails the whole parse.
    pub fn from_compact(s: &str) -> Result<Self, ParseAutomatonError> {
        let records = s
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                line.parse::<StateRecord>()
                    .map_err(|source| ParseAutomatonError::Record {
                        line: index + 1,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_records(&records)?)
    }
}

impl TryFrom<Vec<StateRecord>> for Automaton {
    type Error = InvalidAutomatonError;

    fn try_from(records: Vec<StateRecord>) -> Result<Self, Self::Error> {
        Self::from_records(&records)
    }
}

impl From<Automaton> for Vec<StateRecord> {
    fn from(automaton: Automaton) -> Self {
        automaton.to_records()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_compact_roundtrip_random() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..100 {
            let automaton = Automaton::random(8, &mut rng);
            let parsed = Automaton::from_compact(&automaton.to_compact()).unwrap();
            assert_eq!(parsed, automaton);
        }
    }

    #[test]
    fn test_record_field_order() {
        let record: StateRecord = "5 2 0.040 1 3 2 7".parse().unwrap();
        assert_eq!(record.decision_index, 5);
        assert_eq!(record.decision_type, 2);
        assert_eq!(record.action_false, 1);
        assert_eq!(record.transition_false, 3);
        assert_eq!(record.action_true, 2);
        assert_eq!(record.transition_true, 7);
        assert_eq!(record.to_string(), "5 2 0.040 1 3 2 7");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n0 0 0.500 0 1 2 0\n\n3 2 0.125 1 0 1 1\n\n";
        let automaton = Automaton::from_compact(text).unwrap();
        assert_eq!(automaton.num_states(), 2);
        assert_eq!(automaton.states()[1].on_false.transition, 0);
        assert_eq!(automaton.states()[1].on_true.action, Action::Median);
    }

    #[test]
    fn test_parse_errors() {
        let err = Automaton::from_compact("0 0 0.5 0 0 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseAutomatonError::Record {
                line: 1,
                source: ParseRecordError::FieldCount { found: 6 }
            }
        );

        let err = Automaton::from_compact("0 0 0.5 0 0 0 0\n0 x 0.5 0 0 0 0\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: invalid decision type: \"x\"");

        let err = Automaton::from_compact("6 0 0.5 0 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseAutomatonError::Invalid(InvalidAutomatonError::CodeOutOfRange {
                field: StateField::Feature,
                code: 6,
                ..
            })
        ));

        // Transition 2 in a two-state automaton.
        let err = Automaton::from_compact("0 0 0.5 0 0 0 0\n0 0 0.5 0 2 0 0\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "state 1: transition on false 2 is outside 0..2"
        );

        let err = Automaton::from_compact("0 0 1.500 0 0 0 0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseAutomatonError::Invalid(InvalidAutomatonError::ThresholdOutOfRange { .. })
        ));

        assert_eq!(
            Automaton::from_compact("\n\n").unwrap_err(),
            ParseAutomatonError::Invalid(InvalidAutomatonError::Empty)
        );
    }

    #[test]
    fn test_serde_uses_records() {
        let automaton = Automaton::from_compact("1 1 0.250 2 0 0 0\n").unwrap();
        let json = serde_json::to_string(&automaton).unwrap();
        assert_eq!(
            json,
            r#"[{"decision_index":1,"decision_type":1,"threshold":0.25,"action_false":2,"transition_false":0,"action_true":0,"transition_true":0}]"#
        );
        let back: Automaton = serde_json::from_str(&json).unwrap();
        assert_eq!(back, automaton);

        let bad = r#"[{"decision_index":9,"decision_type":1,"threshold":0.25,"action_false":2,"transition_false":0,"action_true":0,"transition_true":0}]"#;
        assert!(serde_json::from_str::<Automaton>(bad).is_err());
    }
}
