//! cdecl: grammar combinators and a toy C declaration parser
//!
//! The [`grammar`] module provides composable grammar expressions with
//! named results, parse actions and positioned errors. [`decl`] builds
//! grammars for `type name = value;` statements on top of it, and
//! [`tutorial`] walks through the features one at a time.

pub mod decl;
pub mod error;
pub mod grammar;
pub mod tutorial;

// Re-export commonly used types
pub use decl::{parse_declaration, parse_declarations, parse_source, CType, Declaration, Initializer};
pub use error::{CdeclError, CdeclResult, ParseError};
pub use grammar::{Expr, ParseResults, Value};
