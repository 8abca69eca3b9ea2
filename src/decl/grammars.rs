//! Grammars for a tiny subset of C declarations
//!
//! Each builder returns a fresh [`Expr`]; the variants differ only in how
//! their results are shaped (all tokens, named, suppressed punctuation,
//! converted numbers), which is what the tutorial walks through.

use crate::grammar::{
    delimited_list, group, literal, one_of, quoted_string, string_end, suppress, word, word1,
    zero_or_more, CharSet, Expr, Value,
};

/// The primitive types accepted on the left-hand side
pub const TYPE_KEYWORDS: [&str; 4] = ["float", "double", "int", "unsigned"];

/// `float | double | int | unsigned` as a keyword set
pub fn type_keyword() -> Expr {
    one_of(&TYPE_KEYWORDS)
}

/// Same set spelled out as an ordered alternation of literals
pub fn type_literals() -> Expr {
    literal("float") | literal("double") | literal("int") | literal("unsigned")
}

pub fn identifier() -> Expr {
    word(CharSet::alphas(), CharSet::alphanums() + "_")
}

/// Digits and dots, kept as text
pub fn number() -> Expr {
    word1(CharSet::nums() + ".")
}

/// Parse action turning a number token into a float
pub fn to_float(tokens: &[Value]) -> Result<Vec<Value>, String> {
    tokens
        .iter()
        .map(|token| {
            let text = token.to_string();
            let value = text
                .parse::<f64>()
                .map_err(|_| format!("cannot convert '{}' to a number", text))?;
            if !value.is_finite() {
                return Err(format!("'{}' is out of range", text));
            }
            Ok(Value::Float(value))
        })
        .collect()
}

/// `number` with its token converted to a float
pub fn float_number() -> Expr {
    number().set_parse_action(to_float)
}

pub fn assignment() -> Expr {
    literal("=")
}

/// End of statement
pub fn eos() -> Expr {
    literal(";")
}

/// `type identifier = (number | identifier) ;` with every token kept
pub fn c_assignment() -> Expr {
    type_keyword() + identifier() + assignment() + (number() | identifier()) + eos()
}

/// Like [`c_assignment`] with `type`, `new_identifier` and `rhs` names
pub fn named_assignment() -> Expr {
    let mut expr = type_keyword().set_results_name("type")
        + identifier().set_results_name("new_identifier")
        + assignment();
    expr += (number() | identifier()).set_results_name("rhs") + eos();
    expr
}

/// `=` and `;` suppressed, leaving `[type, identifier, rhs]`
pub fn c_statement() -> Expr {
    type_keyword() + identifier() + suppress(assignment()) + (number() | identifier()) + suppress(eos())
}

/// [`c_statement`] with the number converted to a float
pub fn c_statement_with_action() -> Expr {
    type_keyword()
        + identifier()
        + suppress(assignment())
        + (float_number() | identifier())
        + suppress(eos())
}

/// Statement with named `type`, `identifier` and `number` results.
///
/// An identifier on the right-hand side replaces the `identifier` name
/// of the left-hand side, since both use the same name.
pub fn named_statement() -> Expr {
    let identifier = identifier().set_results_name("identifier");
    type_keyword().set_results_name("type")
        + identifier.clone()
        + suppress(assignment())
        + (float_number().set_results_name("number") | identifier)
        + suppress(eos())
}

/// Double quoted C string, backslash escapes allowed
pub fn c_string() -> Expr {
    quoted_string('"', Some('\\'))
}

/// `char* identifier = "text";`
pub fn string_definition() -> Expr {
    literal("char*") + identifier() + suppress(assignment()) + c_string() + suppress(eos())
}

/// Require that nothing follows `expr`
pub fn anchored(expr: Expr) -> Expr {
    expr + string_end()
}

/// `type a = 1, b = c;`, each declarator grouped as `[name, value]`
pub fn multi_declaration() -> Expr {
    let declarator = group(identifier() + suppress(assignment()) + (float_number() | identifier()));
    type_keyword() + delimited_list(declarator, ",") + suppress(eos())
}

/// Any declaration statement, grouped as `[type, [name, value], ...]`
pub fn declaration() -> Expr {
    let numeric = multi_declaration();
    let string_declarator = group(identifier() + suppress(assignment()) + c_string());
    let strings = literal("char*") + delimited_list(string_declarator, ",") + suppress(eos());
    (group(numeric) | group(strings)).set_name("declaration")
}

/// Zero or more declarations filling the whole input
pub fn translation_unit() -> Expr {
    zero_or_more(declaration()) + string_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CdeclError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_forms_agree() {
        for keyword in TYPE_KEYWORDS {
            assert_eq!(
                type_keyword().parse_string(keyword).unwrap(),
                type_literals().parse_string(keyword).unwrap()
            );
        }
    }

    #[test]
    fn test_to_float_rejects_two_dots() {
        let err = float_number().parse_string("1.2.3").unwrap_err();
        assert!(matches!(err, CdeclError::Action(_)));
        assert_eq!(
            err.to_string(),
            "cannot convert '1.2.3' to a number (at char 0), (line:1, col:1)"
        );
    }

    #[test]
    fn test_to_float_rejects_overflow() {
        let digits = "9".repeat(400);
        let err = float_number().parse_string(&digits).unwrap_err();
        assert!(matches!(err, CdeclError::Action(_)));
        assert_eq!(
            err.to_string(),
            format!("'{}' is out of range (at char 0), (line:1, col:1)", digits)
        );
    }

    #[test]
    fn test_multi_declaration_groups() {
        let results = multi_declaration().parse_string("int a = 1, b = c;").unwrap();
        assert_eq!(results.to_string(), "['int', ['a', 1.0], ['b', 'c']]");
    }

    #[test]
    fn test_declaration_accepts_strings() {
        let results = declaration().parse_string(r#"char* a = "x", b = "y";"#).unwrap();
        assert_eq!(results.to_string(), "[['char*', ['a', 'x'], ['b', 'y']]]");
    }

    #[test]
    fn test_declaration_label() {
        let err = declaration().parse_string("x = 1;").unwrap_err();
        assert_eq!(err.to_string(), "Expected declaration (at char 0), (line:1, col:1)");
    }

    #[test]
    fn test_translation_unit() {
        let source = "int a = 1;\ndouble b = 2.5, c = a;\nchar* s = \"hi\";\n";
        let results = translation_unit().parse_string(source).unwrap();
        assert_eq!(results.len(), 3);
    }
}
