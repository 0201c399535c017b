// File: src/interpreter/control_flow.rs
//
// Control flow signals for loop statements.
//
// Every statement evaluates to a `Flow`. A suite stops at the first
// `Break`/`Continue` and hands it to its caller, and loops decide what to do
// with it. No unwinding or error channel is involved.

use super::value::Value;

/// Outcome of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Normal completion, carrying the statement's value
    Normal(Value),
    /// `break` reached: exit the innermost loop
    Break,
    /// `continue` reached: end the current iteration
    Continue,
}

impl Flow {
    pub fn unit() -> Self {
        Flow::Normal(Value::Unit)
    }

    /// True for the signals that cut a suite short
    pub fn is_signal(&self) -> bool {
        !matches!(self, Flow::Normal(_))
    }

    /// The carried value; signals have none
    pub fn into_value(self) -> Value {
        match self {
            Flow::Normal(value) => value,
            Flow::Break | Flow::Continue => Value::Unit,
        }
    }
}
