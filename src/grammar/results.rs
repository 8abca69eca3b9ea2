//! Parse results: the token list produced by a match, plus named access

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::ops::Index;

use crate::error::{CdeclError, CdeclResult};

/// A single token value.
///
/// Terminals always produce `Str`; parse actions may convert to the other
/// variants, and `group` produces `List`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Float(f64),
    Int(i64),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Quoted rendering used by list displays and `dump`
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::Float(v) => format_float(*v),
            Value::Int(v) => v.to_string(),
            Value::List(items) => format!(
                "[{}]",
                items.iter().map(Value::repr).collect::<Vec<_>>().join(", ")
            ),
        }
    }
}

// Integral floats keep a trailing ".0" so they are told apart from ints.
fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Float(v) => write!(f, "{}", format_float(*v)),
            Value::Int(v) => write!(f, "{}", v),
            Value::List(_) => write!(f, "{}", self.repr()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

/// Output of a successful match
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseResults {
    tokens: Vec<Value>,
    named: IndexMap<String, Value>,
}

impl ParseResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tokens(tokens: Vec<Value>) -> Self {
        Self {
            tokens,
            named: IndexMap::new(),
        }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.tokens.push(value);
    }

    /// Append another result, later names overwrite earlier ones
    pub(crate) fn extend(&mut self, other: ParseResults) {
        self.tokens.extend(other.tokens);
        self.named.extend(other.named);
    }

    pub(crate) fn set_name(&mut self, name: &str, value: Value) {
        self.named.insert(name.to_string(), value);
    }

    pub(crate) fn replace_tokens(&mut self, tokens: Vec<Value>) {
        self.tokens = tokens;
    }

    pub(crate) fn take_tokens(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.tokens)
    }

    pub fn tokens(&self) -> &[Value] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Value> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Like `get`, but a missing name is an error
    pub fn require(&self, name: &str) -> CdeclResult<&Value> {
        self.named.get(name).ok_or_else(|| CdeclError::Missing {
            name: name.to_string(),
        })
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Destructure the token list into exactly `N` values
    pub fn into_array<const N: usize>(self) -> CdeclResult<[Value; N]> {
        self.tokens
            .try_into()
            .map_err(|tokens: Vec<Value>| CdeclError::Arity {
                expected: N,
                found: tokens.len(),
            })
    }

    /// Token list followed by one `- name: value` line per named result,
    /// sorted by name
    pub fn dump(&self) -> String {
        let mut out = self.to_string();
        let mut names: Vec<_> = self.named.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in names {
            out.push_str(&format!("\n- {}: {}", name, value.repr()));
        }
        out
    }
}

impl fmt::Display for ParseResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<_> = self.tokens.iter().map(Value::repr).collect();
        write!(f, "[{}]", items.join(", "))
    }
}

impl Index<usize> for ParseResults {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.tokens[index]
    }
}

impl IntoIterator for ParseResults {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
