//! Grammar combinators
//!
//! Building blocks for small text grammars: terminals, sequencing,
//! alternation, suppression, named results, parse actions and an
//! end-of-input anchor. Whitespace between tokens is skipped by default.
//!
//! ```
//! use cdecl::grammar::{literal, word, CharSet};
//!
//! let ident = word(CharSet::alphas(), CharSet::alphanums() + "_");
//! let assignment = ident.clone() + literal("=") + ident;
//! let results = assignment.parse_string("x = y").unwrap();
//! assert_eq!(results.to_string(), "['x', '=', 'y']");
//! ```

mod chars;
mod engine;
mod expr;
mod results;

pub use chars::CharSet;
pub use engine::{parse_at, parse_with, ParseOptions, DEFAULT_WHITESPACE};
pub use expr::{
    delimited_list, group, literal, one_of, one_or_more, optional, quoted_string, string_end,
    suppress, word, word1, zero_or_more, Expr, ExprKind, ParseAction,
};
pub use results::{ParseResults, Value};
