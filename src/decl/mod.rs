//! C declaration grammars
//!
//! Covers statements of the form `type identifier = value;` where `type` is
//! one of `float`, `double`, `int` or `unsigned` and `value` is a number or
//! another identifier, plus `char* identifier = "text";`. Several
//! declarators may share one statement (`double x = 7, y = 9;`).
//!
//! [`grammars`] exposes the raw grammar expressions; [`parse_declaration`]
//! and friends turn their results into typed [`Declaration`]s.

mod ast;
pub mod grammars;
mod parser;

pub use ast::{CType, Declaration, Initializer};
pub use parser::{
    parse_declaration, parse_declarations, parse_source, parse_source_collect, DeclarationParser,
};
