// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the Emo language.
// Executes Emo programs by traversing the parse tree (see ast.rs).
//
// The interpreter owns a stack of scopes (the symbol table), evaluates
// expressions to scalar values, and executes statements to perform actions:
// - Variable declaration and assignment with block scoping
// - Printing to stdout or to a capture buffer
// - if/elif/else, while and C-style for loops
// - break/continue, propagated as `Flow` signals
//
// Operators and keywords are recognized in both their glyph and canonical
// spellings, so a tree that went through the glyph normalization pass runs
// exactly like one that did not.

mod control_flow;
mod environment;
mod value;

pub use control_flow::Flow;
pub use environment::Environment;
pub use value::Value;

use crate::ast::{Node, NodeKind};
use crate::errors::{EmoError, SourceLocation};
use crate::glyphs;
use crate::lexer::Token;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Whether an `AssignmentStatement` creates a binding or updates one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    Declare,
    Assign,
}

type EvalResult<T> = Result<T, EmoError>;

/// Main interpreter that executes Emo programs
pub struct Interpreter {
    pub env: Environment,
    output: Option<Arc<Mutex<Vec<u8>>>>,
    debug_scopes: bool,
}

impl Interpreter {
    /// Creates a new interpreter with an empty scope stack
    pub fn new() -> Self {
        Interpreter { env: Environment::new(), output: None, debug_scopes: false }
    }

    /// Sets the output sink for print statements (used for testing)
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    /// Dump the symbol table to stderr after every declaration and assignment
    pub fn set_debug_scopes(&mut self, enabled: bool) {
        self.debug_scopes = enabled;
    }

    pub fn debug_scopes(&self) -> bool {
        self.debug_scopes
    }

    /// Runs a whole program on a fresh scope stack holding one root scope.
    ///
    /// The root scope is kept afterwards so the final bindings can be inspected.
    pub fn execute(&mut self, program: &Node) -> EvalResult<()> {
        self.env = Environment::new();
        self.env.push_scope();
        debug!(statements = program.len(), "executing program");
        self.visit(program)?;
        Ok(())
    }

    /// Runs a program on top of the current scopes (REPL use).
    ///
    /// Returns the value of the last top-level statement.
    pub fn execute_in_place(&mut self, program: &Node) -> EvalResult<Value> {
        if self.env.depth() == 0 {
            self.env.push_scope();
        }
        Ok(self.visit(program)?.into_value())
    }

    /// Helper to write output to either the output buffer or stdout
    fn write_output(&self, msg: &str) {
        if let Some(out) = &self.output {
            if let Ok(mut buffer) = out.lock() {
                let _ = writeln!(buffer, "{}", msg);
            }
        } else {
            println!("{}", msg);
        }
    }

    fn debug_dump(&self) {
        if self.debug_scopes {
            eprint!("{}", self.env.dump());
        }
    }

    /// Evaluates a node that must produce a value
    fn eval(&mut self, node: &Node) -> EvalResult<Value> {
        Ok(self.visit(node)?.into_value())
    }

    /// Executes any node; statements may yield a flow signal
    fn visit(&mut self, node: &Node) -> EvalResult<Flow> {
        match node.kind {
            NodeKind::Program => {
                // Stray top-level break/continue signals are ignored
                let mut last = Value::Unit;
                for child in node.children.iter().filter_map(|c| c.as_node()) {
                    last = self.visit(child)?.into_value();
                }
                Ok(Flow::Normal(last))
            }
            NodeKind::Suite => {
                for child in node.children.iter().filter_map(|c| c.as_node()) {
                    let flow = self.visit(child)?;
                    if flow.is_signal() {
                        return Ok(flow);
                    }
                }
                Ok(Flow::unit())
            }
            NodeKind::DeclareStatement => self.exec_declare(node),
            NodeKind::AssignmentStatement => self.exec_assignment(node, AssignMode::Assign),
            NodeKind::PrintStatement => {
                if let Some(expr) = node.node(0) {
                    let value = self.eval(expr)?;
                    self.write_output(&value.to_string());
                }
                Ok(Flow::unit())
            }
            NodeKind::IfStatement => self.exec_if(node),
            NodeKind::WhileStatement => self.exec_while(node),
            NodeKind::ForStatement => self.exec_for(node),
            NodeKind::ForDecl | NodeKind::ForUpdates => {
                for child in node.children.iter().filter_map(|c| c.as_node()) {
                    self.visit(child)?;
                }
                Ok(Flow::unit())
            }
            NodeKind::ForTest => match node.node(0) {
                Some(expr) => Ok(Flow::Normal(self.eval(expr)?)),
                None => Ok(Flow::Normal(Value::Bool(true))),
            },
            NodeKind::FlowStatement => Ok(match node.token(0) {
                Some(t) if glyphs::is(t, "break") => Flow::Break,
                Some(t) if glyphs::is(t, "continue") => Flow::Continue,
                _ => Flow::unit(),
            }),
            NodeKind::LogicalOrExpr
            | NodeKind::LogicalAndExpr
            | NodeKind::EqualityExpr
            | NodeKind::AdditiveExpr
            | NodeKind::MultiplicativeExpr => Ok(Flow::Normal(self.eval_chain(node)?)),
            NodeKind::CastExpr => Ok(Flow::Normal(self.eval_cast(node)?)),
            NodeKind::Name => match node.token(0) {
                Some(name) => Ok(Flow::Normal(self.env.lookup(&name.text, SourceLocation::of(name))?)),
                None => Ok(Flow::unit()),
            },
            NodeKind::Number => Ok(Flow::Normal(
                node.token(0).map(|t| Value::from_number_literal(&t.text)).unwrap_or(Value::Int(0)),
            )),
            NodeKind::Boolean => Ok(Flow::Normal(Value::Bool(
                node.token(0).is_some_and(|t| glyphs::is(t, "true")),
            ))),
            NodeKind::String => Ok(Flow::Normal(Value::str(
                node.token(0).map(|t| t.text.as_str()).unwrap_or_default(),
            ))),
        }
    }

    /// Runs a block body in its own scope; the scope is popped even on error
    fn exec_block(&mut self, body: &Node) -> EvalResult<Flow> {
        self.env.push_scope();
        let flow = self.visit(body);
        self.env.pop_scope();
        flow
    }

    fn exec_declare(&mut self, node: &Node) -> EvalResult<Flow> {
        for entry in node.children.iter().filter_map(|c| c.as_node()) {
            match entry.kind {
                NodeKind::Name => {
                    if let Some(name) = entry.token(0) {
                        self.env.declare(&name.text, Value::Unit, SourceLocation::of(name))?;
                        self.debug_dump();
                    }
                }
                NodeKind::AssignmentStatement => {
                    self.exec_assignment(entry, AssignMode::Declare)?;
                }
                _ => {}
            }
        }
        Ok(Flow::unit())
    }

    /// `name = expr`, either binding a new name or updating an existing one
    fn exec_assignment(&mut self, stmt: &Node, mode: AssignMode) -> EvalResult<Flow> {
        let Some(name) = stmt.node(0).and_then(|n| n.token(0)) else {
            return Ok(Flow::unit());
        };
        let value = match stmt.node(1) {
            Some(expr) => self.eval(expr)?,
            None => Value::Unit,
        };

        let location = SourceLocation::of(name);
        match mode {
            AssignMode::Declare => self.env.declare(&name.text, value, location)?,
            AssignMode::Assign => self.env.assign(&name.text, value, location)?,
        }
        self.debug_dump();
        Ok(Flow::unit())
    }

    /// Walks `keyword cond body` triples; the first truthy branch runs and
    /// later conditions are never evaluated.
    fn exec_if(&mut self, node: &Node) -> EvalResult<Flow> {
        let mut i = 0;
        while i < node.len() {
            let Some(keyword) = node.token(i) else {
                i += 1;
                continue;
            };

            if glyphs::is_any(keyword, &["if", "elif"]) {
                if let (Some(cond), Some(body)) = (node.node(i + 1), node.node(i + 2)) {
                    if self.eval(cond)?.to_bool() {
                        return self.exec_block(body);
                    }
                }
                i += 3;
            } else if glyphs::is(keyword, "else") {
                if let Some(body) = node.node(i + 1) {
                    return self.exec_block(body);
                }
                i += 2;
            } else {
                i += 1;
            }
        }
        Ok(Flow::unit())
    }

    fn exec_while(&mut self, node: &Node) -> EvalResult<Flow> {
        let (Some(cond), Some(body)) = (node.node(0), node.node(1)) else {
            return Ok(Flow::unit());
        };

        while self.eval(cond)?.to_bool() {
            if self.exec_block(body)? == Flow::Break {
                break;
            }
        }
        Ok(Flow::unit())
    }

    /// The init variable lives in an outer scope that wraps every iteration
    fn exec_for(&mut self, node: &Node) -> EvalResult<Flow> {
        let (Some(decl), Some(test), Some(updates), Some(body)) =
            (node.node(0), node.node(1), node.node(2), node.node(3))
        else {
            return Ok(Flow::unit());
        };

        self.env.push_scope();
        let result = self.run_for_loop(decl, test, updates, body);
        self.env.pop_scope();
        result
    }

    fn run_for_loop(&mut self, decl: &Node, test: &Node, updates: &Node, body: &Node) -> EvalResult<Flow> {
        self.visit(decl)?;
        while self.eval(test)?.to_bool() {
            // A `continue` only cuts the body short; the updates still run
            if self.exec_block(body)? == Flow::Break {
                break;
            }
            self.visit(updates)?;
        }
        Ok(Flow::unit())
    }

    /// Flat `operand (op operand)*` chain, folded left to right
    fn eval_chain(&mut self, node: &Node) -> EvalResult<Value> {
        let Some(first) = node.node(0) else {
            return Ok(Value::Unit);
        };
        let mut acc = self.eval(first)?;

        let mut i = 1;
        while i + 1 < node.len() {
            if let (Some(op), Some(rhs)) = (node.token(i), node.node(i + 1)) {
                let right = self.eval(rhs)?;
                acc = binary_op(op, acc, right)?;
            }
            i += 2;
        }
        Ok(acc)
    }

    fn eval_cast(&mut self, node: &Node) -> EvalResult<Value> {
        let (Some(op), Some(operand)) = (node.token(0), node.node(1)) else {
            return Ok(Value::Unit);
        };
        let value = self.eval(operand)?;
        Ok(match glyphs::canonical(&op.text) {
            "!" | "not" => Value::Bool(!value.to_bool()),
            "~" => Value::Int(!value.to_i64()),
            _ => Value::Unit,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// `+ - *` stay integral when both sides are `Int`, else go through f64
fn arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    match (left.as_integral(), right.as_integral()) {
        (Some(a), Some(b)) => Value::Int(int_op(a, b)),
        _ => Value::Float(float_op(left.to_f64(), right.to_f64())),
    }
}

fn relate<T: PartialOrd>(op: &str, a: T, b: T) -> bool {
    match op {
        "<" => a < b,
        ">" => a > b,
        "<=" => a <= b,
        _ => a >= b,
    }
}

fn compare(op: &str, left: &Value, right: &Value) -> bool {
    match (left.as_integral(), right.as_integral()) {
        (Some(a), Some(b)) => relate(op, a, b),
        _ => relate(op, left.to_f64(), right.to_f64()),
    }
}

/// Applies one binary operator; an unknown operator leaves the left side as is
fn binary_op(op: &Token, left: Value, right: Value) -> EvalResult<Value> {
    let value = match glyphs::canonical(&op.text) {
        "+" => arithmetic(&left, &right, i64::wrapping_add, |a, b| a + b),
        "-" => arithmetic(&left, &right, i64::wrapping_sub, |a, b| a - b),
        "*" => arithmetic(&left, &right, i64::wrapping_mul, |a, b| a * b),
        "/" => Value::Float(left.to_f64() / right.to_f64()),
        "%" | "mod" => {
            let divisor = right.to_i64();
            if divisor == 0 {
                return Err(EmoError::division_by_zero(SourceLocation::of(op)));
            }
            Value::Int(left.to_i64().wrapping_rem(divisor))
        }
        // Equality is string-form equality: 3 == 3.0 compares "3" with "3.000000"
        "==" => Value::Bool(left.to_string() == right.to_string()),
        "!=" => Value::Bool(left.to_string() != right.to_string()),
        rel @ ("<" | ">" | "<=" | ">=") => Value::Bool(compare(rel, &left, &right)),
        "&" => Value::Int(left.to_i64() & right.to_i64()),
        "|" => Value::Int(left.to_i64() | right.to_i64()),
        "^" | "xor" => Value::Int(left.to_i64() ^ right.to_i64()),
        "and" | "&&" => Value::Bool(left.to_bool() && right.to_bool()),
        "or" | "||" => Value::Bool(left.to_bool() || right.to_bool()),
        _ => left,
    };
    Ok(value)
}
