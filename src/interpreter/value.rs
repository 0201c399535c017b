// File: src/interpreter/value.rs
//
// Runtime value types for the Emo language.
// Values are small scalars copied by value; there are no references,
// collections or functions.

use crate::lexer::is_space;
use std::fmt;

/// Runtime values in the Emo interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Declared but never assigned
    #[default]
    Unit,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    Str(String),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Value of a number literal: floating when the text has a dot,
    /// integral otherwise. Only the leading numeric part counts, so `1.2.3`
    /// is `1.2`; `Int(0)` when nothing parses.
    pub fn from_number_literal(text: &str) -> Self {
        let parsed = if text.contains('.') {
            float_prefix(text).map(Value::Float)
        } else {
            int_prefix(text).map(Value::Int)
        };
        parsed.unwrap_or(Value::Int(0))
    }

    /// Integral view used by arithmetic: only `Int` stays integral,
    /// everything else (`Unit` included) promotes the operation to floating point.
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Value::Unit => false,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty() && s != "false" && s != "0",
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Unit => 0.0,
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Str(s) => float_prefix(s).unwrap_or(0.0),
        }
    }

    pub fn to_i64(&self) -> i64 {
        match self {
            Value::Unit => 0,
            Value::Int(n) => *n,
            Value::Float(n) => *n as i64,
            Value::Bool(b) => i64::from(*b),
            Value::Str(s) => int_prefix(s).unwrap_or(0),
        }
    }

    /// Short type name for debug dumps
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
        }
    }
}

/// Longest numeric prefix of `text` after leading whitespace, following
/// strtol/strtod: an optional sign, digits, and for floats an optional
/// fraction and exponent. `None` when the prefix holds no digit.
fn numeric_prefix(text: &str, float: bool) -> Option<&str> {
    let s = text.trim_start_matches(is_space);
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        let mut end = start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    };

    let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if float && bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if float && matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    Some(&s[..end])
}

/// Integer prefix; out-of-range values count as unparsable
fn int_prefix(text: &str) -> Option<i64> {
    numeric_prefix(text, false).and_then(|p| p.parse().ok())
}

/// Floating prefix; overflow to infinity counts as unparsable
fn float_prefix(text: &str) -> Option<f64> {
    numeric_prefix(text, true)
        .and_then(|p| p.parse::<f64>().ok())
        .filter(|f| f.is_finite())
}

/// The string form used by `print` and by `==`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("0"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) if n.is_nan() => f.write_str(if n.is_sign_negative() { "-nan" } else { "nan" }),
            Value::Float(n) => write!(f, "{:.6}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
        }
    }
}
