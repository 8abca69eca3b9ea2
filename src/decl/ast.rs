//! Typed view of parsed declarations

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{CdeclError, Span};

/// The declaration types understood by the grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CType {
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "unsigned")]
    Unsigned,
    #[serde(rename = "char*")]
    CharPtr,
}

impl CType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CType::Float => "float",
            CType::Double => "double",
            CType::Int => "int",
            CType::Unsigned => "unsigned",
            CType::CharPtr => "char*",
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CType {
    type Err = CdeclError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "float" => Ok(CType::Float),
            "double" => Ok(CType::Double),
            "int" => Ok(CType::Int),
            "unsigned" => Ok(CType::Unsigned),
            "char*" => Ok(CType::CharPtr),
            other => Err(CdeclError::Other(format!("unknown type '{}'", other))),
        }
    }
}

/// Right-hand side of a declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Initializer {
    Number(f64),
    Identifier(String),
    Str(String),
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initializer::Number(v) => write!(f, "{}", v),
            Initializer::Identifier(name) => write!(f, "{}", name),
            Initializer::Str(s) => {
                let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{}\"", escaped)
            }
        }
    }
}

/// `type name = value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    #[serde(rename = "type")]
    pub ty: CType,
    pub name: String,
    pub value: Initializer,
    /// Span of the whole statement the declaration came from
    pub span: Span,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {};", self.ty, self.name, self.value)
    }
}
