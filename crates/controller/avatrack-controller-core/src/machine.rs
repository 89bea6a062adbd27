//! State machines: states, guarded transitions and a default state.
//!
//! A state holds nothing, a motion, or a nested machine. Transitions are
//! gated purely by their conditions (no exit time in generated graphs).

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use avatrack_api_core::Value;

use crate::error::GenerateError;
use crate::motion::Motion;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StateId(pub u32);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content", rename_all = "snake_case")]
pub enum StateContent {
    /// Neutral state: animates nothing.
    Empty,
    Motion { motion: Motion },
    Machine { machine: Box<StateMachine> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    #[serde(flatten)]
    pub content: StateContent,
    /// Editor graph position.
    pub position: [f32; 2],
    pub write_default_values: bool,
}

impl State {
    pub fn motion(&self) -> Option<&Motion> {
        match &self.content {
            StateContent::Motion { motion } => Some(motion),
            _ => None,
        }
    }

    pub fn machine(&self) -> Option<&StateMachine> {
        match &self.content {
            StateContent::Machine { machine } => Some(machine),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionMode {
    If,
    IfNot,
    Equals,
}

/// One literal of a transition guard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub mode: ConditionMode,
    pub parameter: String,
    pub threshold: f32,
}

impl Condition {
    pub fn is_true(parameter: &str) -> Self {
        Self {
            mode: ConditionMode::If,
            parameter: parameter.to_string(),
            threshold: 0.0,
        }
    }

    pub fn is_false(parameter: &str) -> Self {
        Self {
            mode: ConditionMode::IfNot,
            parameter: parameter.to_string(),
            threshold: 0.0,
        }
    }

    pub fn equals(parameter: &str, value: i32) -> Self {
        Self {
            mode: ConditionMode::Equals,
            parameter: parameter.to_string(),
            threshold: value as f32,
        }
    }

    /// Evaluate against the current value of the parameter.
    pub fn holds(&self, value: Value) -> bool {
        let v = value.as_f32();
        match self.mode {
            ConditionMode::If => v != 0.0,
            ConditionMode::IfNot => v == 0.0,
            ConditionMode::Equals => v == self.threshold,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub source: StateId,
    pub destination: StateId,
    /// Conjunction; alternatives are separate transitions.
    pub conditions: Vec<Condition>,
    pub duration: f32,
    pub has_exit_time: bool,
}

impl Transition {
    pub fn new(source: StateId, destination: StateId, duration: f32) -> Self {
        Self {
            source,
            destination,
            conditions: Vec::new(),
            duration,
            has_exit_time: false,
        }
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// All conditions hold; missing parameters never satisfy a condition.
    pub fn enabled<F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<Value>,
    {
        self.conditions
            .iter()
            .all(|c| lookup(&c.parameter).is_some_and(|v| c.holds(v)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMachine {
    pub name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    default_state: Option<StateId>,
    next_id: u32,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a state; generated states never write default values.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        position: [f32; 2],
        content: StateContent,
    ) -> StateId {
        let id = StateId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.states.push(State {
            id,
            name: name.into(),
            content,
            position,
            write_default_values: false,
        });
        id
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn set_default_state(&mut self, id: StateId) {
        self.default_state = Some(id);
    }

    pub fn default_state(&self) -> Option<StateId> {
        self.default_state
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn transitions_from(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.source == id)
    }

    /// First enabled transition out of `current`, in authoring order.
    pub fn next_state<F>(&self, current: StateId, lookup: F) -> Option<StateId>
    where
        F: Fn(&str) -> Option<Value>,
    {
        self.transitions_from(current)
            .find(|t| t.enabled(&lookup))
            .map(|t| t.destination)
    }

    /// Structural checks, recursing into nested machines: a default state is
    /// set, every edge joins existing states, and with more than one state
    /// every state can be left.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let invalid = |reason: String| GenerateError::InvalidMachine {
            machine: self.name.clone(),
            reason,
        };
        let default = self
            .default_state
            .ok_or_else(|| invalid("no default state".into()))?;
        if self.state(default).is_none() {
            return Err(invalid(format!("default state {default:?} does not exist")));
        }
        let mut names = HashSet::with_capacity(self.states.len());
        if let Some(dup) = self.states.iter().find(|s| !names.insert(s.name.as_str())) {
            return Err(invalid(format!("duplicate state name '{}'", dup.name)));
        }
        for t in &self.transitions {
            if self.state(t.source).is_none() || self.state(t.destination).is_none() {
                return Err(invalid(format!(
                    "transition {:?} -> {:?} references a missing state",
                    t.source, t.destination
                )));
            }
        }
        if self.states.len() > 1 {
            if let Some(stuck) = self
                .states
                .iter()
                .find(|s| self.transitions_from(s.id).next().is_none())
            {
                return Err(invalid(format!("state '{}' has no outgoing edge", stuck.name)));
            }
        }
        for state in &self.states {
            if let Some(nested) = state.machine() {
                nested.validate()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> (StateMachine, StateId, StateId) {
        let mut m = StateMachine::new("Test");
        let a = m.add_state("A", [0.0, 0.0], StateContent::Empty);
        let b = m.add_state("B", [0.0, 100.0], StateContent::Empty);
        m.set_default_state(a);
        (m, a, b)
    }

    #[test]
    fn conditions_evaluate_against_values() {
        assert!(Condition::is_true("P").holds(Value::Bool(true)));
        assert!(!Condition::is_true("P").holds(Value::Bool(false)));
        assert!(Condition::is_false("P").holds(Value::Bool(false)));
        assert!(Condition::equals("P", 2).holds(Value::Int(2)));
        assert!(!Condition::equals("P", 2).holds(Value::Int(1)));
    }

    #[test]
    fn next_state_requires_every_condition() {
        let (mut m, a, b) = two_state();
        m.add_transition(
            Transition::new(a, b, 0.2)
                .when(Condition::is_true("X"))
                .when(Condition::is_true("Y")),
        );
        let only_x = |p: &str| match p {
            "X" => Some(Value::Bool(true)),
            "Y" => Some(Value::Bool(false)),
            _ => None,
        };
        assert_eq!(m.next_state(a, only_x), None);
        assert_eq!(m.next_state(a, |_| Some(Value::Bool(true))), Some(b));
        assert_eq!(m.next_state(a, |_| None), None);
    }

    #[test]
    fn validate_flags_dead_ends_and_missing_default() {
        let (mut m, a, b) = two_state();
        m.add_transition(Transition::new(a, b, 0.1));
        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("state 'B' has no outgoing edge"), "{err}");

        m.add_transition(Transition::new(b, a, 0.1));
        assert!(m.validate().is_ok());

        let mut no_default = StateMachine::new("Bare");
        no_default.add_state("Only", [0.0, 0.0], StateContent::Empty);
        assert!(no_default.validate().is_err());
    }

    #[test]
    fn duplicate_state_names_are_rejected() {
        let (mut m, a, b) = two_state();
        m.add_transition(Transition::new(a, b, 0.1));
        m.add_transition(Transition::new(b, a, 0.1));
        let c = m.add_state("A", [0.0, 200.0], StateContent::Empty);
        m.add_transition(Transition::new(c, a, 0.1));
        let err = m.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate state name 'A'"), "{err}");
    }

    #[test]
    fn nested_machines_are_validated() {
        let (inner, _, _) = two_state();
        let mut outer = StateMachine::new("Outer");
        let s = outer.add_state(
            "Nested",
            [0.0, 0.0],
            StateContent::Machine {
                machine: Box::new(inner),
            },
        );
        outer.set_default_state(s);
        assert!(matches!(
            outer.validate(),
            Err(GenerateError::InvalidMachine { machine, .. }) if machine == "Test"
        ));
    }

    #[test]
    fn states_never_write_defaults() {
        let (m, _, _) = two_state();
        assert!(m.states().iter().all(|s| !s.write_default_values));
        assert_eq!(m.state_by_name("B").map(|s| s.position), Some([0.0, 100.0]));
    }
}
