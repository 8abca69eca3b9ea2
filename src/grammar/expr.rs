//! Grammar expressions
//!
//! An [`Expr`] is an immutable, cheaply clonable description of what to
//! match. Terminals (`literal`, `one_of`, `word`, `quoted_string`,
//! `string_end`) are composed with `+` (sequence) and `|` (ordered
//! alternation), then decorated with result names, parse actions or
//! suppression. Decorating always returns a new expression, so a shared
//! building block such as `identifier()` can be named differently in two
//! grammars.

use std::fmt;
use std::ops::{Add, AddAssign, BitOr};
use std::sync::Arc;

use super::chars::CharSet;
use super::results::Value;

/// Callback run on the tokens of a successful match.
///
/// Returns the replacement tokens, or a message describing why the
/// tokens were rejected.
pub type ParseAction = Arc<dyn Fn(&[Value]) -> Result<Vec<Value>, String> + Send + Sync>;

/// The matching rule of an expression
#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(String),
    OneOf(Vec<String>),
    Word { init: CharSet, body: CharSet },
    QuotedString { quote: char, escape: Option<char> },
    StringEnd,
    And(Vec<Expr>),
    MatchFirst(Vec<Expr>),
    Suppress(Box<Expr>),
    Optional(Box<Expr>),
    ZeroOrMore(Box<Expr>),
    OneOrMore(Box<Expr>),
    Group(Box<Expr>),
}

/// A composable grammar expression
#[derive(Clone)]
pub struct Expr {
    pub(crate) kind: ExprKind,
    pub(crate) results_name: Option<String>,
    pub(crate) action: Option<ParseAction>,
    pub(crate) label: Option<String>,
    pub(crate) skip_whitespace: bool,
}

impl Expr {
    fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            results_name: None,
            action: None,
            label: None,
            skip_whitespace: true,
        }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    pub fn results_name(&self) -> Option<&str> {
        self.results_name.as_deref()
    }

    /// Store the tokens of this expression under `name` in the results
    pub fn set_results_name(&self, name: &str) -> Expr {
        let mut expr = self.clone();
        expr.results_name = Some(name.to_string());
        expr
    }

    /// Replace matched tokens with the output of `action`
    pub fn set_parse_action<F>(&self, action: F) -> Expr
    where
        F: Fn(&[Value]) -> Result<Vec<Value>, String> + Send + Sync + 'static,
    {
        let mut expr = self.clone();
        expr.action = Some(Arc::new(action));
        expr
    }

    /// Label used in "Expected ..." messages
    pub fn set_name(&self, label: &str) -> Expr {
        let mut expr = self.clone();
        expr.label = Some(label.to_string());
        expr
    }

    /// Match without skipping whitespace first, recursively
    pub fn leave_whitespace(&self) -> Expr {
        let mut expr = self.clone();
        expr.skip_whitespace = false;
        expr.kind = match expr.kind {
            ExprKind::And(items) => ExprKind::And(items.iter().map(Expr::leave_whitespace).collect()),
            ExprKind::MatchFirst(items) => {
                ExprKind::MatchFirst(items.iter().map(Expr::leave_whitespace).collect())
            }
            ExprKind::Suppress(inner) => ExprKind::Suppress(Box::new(inner.leave_whitespace())),
            ExprKind::Optional(inner) => ExprKind::Optional(Box::new(inner.leave_whitespace())),
            ExprKind::ZeroOrMore(inner) => ExprKind::ZeroOrMore(Box::new(inner.leave_whitespace())),
            ExprKind::OneOrMore(inner) => ExprKind::OneOrMore(Box::new(inner.leave_whitespace())),
            ExprKind::Group(inner) => ExprKind::Group(Box::new(inner.leave_whitespace())),
            terminal => terminal,
        };
        expr
    }

    pub fn suppress(&self) -> Expr {
        suppress(self.clone())
    }

    // Plain combinators can absorb more operands instead of nesting.
    fn is_plain(&self) -> bool {
        self.results_name.is_none() && self.action.is_none() && self.label.is_none() && self.skip_whitespace
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expr")
            .field("kind", &self.kind)
            .field("results_name", &self.results_name)
            .field("action", &self.action.as_ref().map(|_| "<fn>"))
            .field("label", &self.label)
            .field("skip_whitespace", &self.skip_whitespace)
            .finish()
    }
}

fn join_labels(items: &[Expr], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return write!(f, "{}", label);
        }
        match &self.kind {
            ExprKind::Literal(s) => write!(f, "\"{}\"", s),
            ExprKind::OneOf(words) => {
                let quoted: Vec<_> = words.iter().map(|w| format!("\"{}\"", w)).collect();
                write!(f, "{{{}}}", quoted.join(" | "))
            }
            ExprKind::Word { init, body } => {
                if init == body {
                    write!(f, "W:({})", init)
                } else {
                    write!(f, "W:({}, {})", init, body)
                }
            }
            ExprKind::QuotedString { quote, .. } => write!(f, "string enclosed in '{}'", quote),
            ExprKind::StringEnd => write!(f, "end of text"),
            ExprKind::And(items) => write!(f, "{{{}}}", join_labels(items, " ")),
            ExprKind::MatchFirst(items) => write!(f, "{{{}}}", join_labels(items, " | ")),
            ExprKind::Suppress(inner) => write!(f, "{}", inner),
            ExprKind::Optional(inner) => write!(f, "[{}]", inner),
            ExprKind::ZeroOrMore(inner) => write!(f, "[{}]...", inner),
            ExprKind::OneOrMore(inner) => write!(f, "{{{}}}...", inner),
            ExprKind::Group(inner) => write!(f, "Group:({})", inner),
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        if self.is_plain() {
            if let ExprKind::And(mut items) = self.kind {
                items.push(rhs);
                return Expr::new(ExprKind::And(items));
            }
        }
        Expr::new(ExprKind::And(vec![self, rhs]))
    }
}

impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        let lhs = std::mem::replace(self, Expr::new(ExprKind::And(Vec::new())));
        *self = lhs + rhs;
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        if self.is_plain() {
            if let ExprKind::MatchFirst(mut items) = self.kind {
                items.push(rhs);
                return Expr::new(ExprKind::MatchFirst(items));
            }
        }
        Expr::new(ExprKind::MatchFirst(vec![self, rhs]))
    }
}

/// Match `s` exactly
pub fn literal(s: &str) -> Expr {
    Expr::new(ExprKind::Literal(s.to_string()))
}

/// Match any of `words`; when several match, the longest wins
pub fn one_of(words: &[&str]) -> Expr {
    Expr::new(ExprKind::OneOf(words.iter().map(|w| w.to_string()).collect()))
}

/// First character from `init`, then any number from `body`
pub fn word(init: CharSet, body: CharSet) -> Expr {
    Expr::new(ExprKind::Word { init, body })
}

/// One or more characters from `chars`
pub fn word1(chars: CharSet) -> Expr {
    Expr::new(ExprKind::Word {
        init: chars.clone(),
        body: chars,
    })
}

/// Text between two `quote` characters, returned unquoted and unescaped
pub fn quoted_string(quote: char, escape: Option<char>) -> Expr {
    Expr::new(ExprKind::QuotedString { quote, escape })
}

/// Succeeds only at the end of the input
pub fn string_end() -> Expr {
    Expr::new(ExprKind::StringEnd)
}

/// Match `expr` but drop its tokens
pub fn suppress(expr: Expr) -> Expr {
    Expr::new(ExprKind::Suppress(Box::new(expr)))
}

pub fn optional(expr: Expr) -> Expr {
    Expr::new(ExprKind::Optional(Box::new(expr)))
}

pub fn zero_or_more(expr: Expr) -> Expr {
    Expr::new(ExprKind::ZeroOrMore(Box::new(expr)))
}

pub fn one_or_more(expr: Expr) -> Expr {
    Expr::new(ExprKind::OneOrMore(Box::new(expr)))
}

/// Collect the tokens of `expr` into a single list value
pub fn group(expr: Expr) -> Expr {
    Expr::new(ExprKind::Group(Box::new(expr)))
}

/// `expr (sep expr)*`, separators suppressed
pub fn delimited_list(expr: Expr, sep: &str) -> Expr {
    let label = format!("{} [{} {}]...", expr, sep, expr);
    (expr.clone() + zero_or_more(suppress(literal(sep)) + expr)).set_name(&label)
}
