//! From grammar results to [`Declaration`]s

use super::ast::{CType, Declaration, Initializer};
use super::grammars::declaration;
use crate::error::{CdeclError, CdeclResult, Span};
use crate::grammar::{parse_at, Expr, ParseOptions, Value};

fn malformed(what: &str) -> CdeclError {
    CdeclError::Other(format!("malformed declaration: {}", what))
}

/// Convert one `[type, [name, value], ...]` statement group
fn statement_to_declarations(statement: &Value, span: Span) -> CdeclResult<Vec<Declaration>> {
    let parts = statement.as_list().ok_or_else(|| malformed("statement is not a group"))?;
    let (ty, declarators) = parts.split_first().ok_or_else(|| malformed("empty statement"))?;
    let ty: CType = ty
        .as_str()
        .ok_or_else(|| malformed("type is not text"))?
        .parse()?;

    declarators
        .iter()
        .map(|declarator| {
            let (name, value) = match declarator.as_list() {
                Some([Value::Str(name), value]) => (name.clone(), value),
                _ => return Err(malformed("declarator is not [name, value]")),
            };
            let value = match (ty, value) {
                (CType::CharPtr, Value::Str(text)) => Initializer::Str(text.clone()),
                (_, Value::Float(v)) => Initializer::Number(*v),
                (_, Value::Str(ident)) => Initializer::Identifier(ident.clone()),
                (_, other) => return Err(malformed(&format!("unexpected value {}", other.repr()))),
            };
            Ok(Declaration {
                ty,
                name,
                value,
                span,
            })
        })
        .collect()
}

/// Parses declaration statements one at a time out of a source text
pub struct DeclarationParser<'a> {
    source: &'a str,
    grammar: Expr,
    options: ParseOptions,
    pos: usize,
}

impl<'a> DeclarationParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            grammar: declaration(),
            options: ParseOptions::default(),
            pos: 0,
        }
    }

    /// Byte index of the next unparsed statement
    pub fn position(&self) -> usize {
        self.pos
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| self.options.whitespace.contains(c));
        self.pos += rest.len() - trimmed.len();
    }

    pub fn is_at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.source.len()
    }

    /// Parse the next statement; `None` once only whitespace remains.
    ///
    /// A failed statement is skipped up to and including its next `;`, so
    /// repeated calls move on to the following statement.
    pub fn next_statement(&mut self) -> Option<CdeclResult<Vec<Declaration>>> {
        if self.is_at_end() {
            return None;
        }
        let start = self.pos;
        let outcome = parse_at(&self.grammar, self.source, start, &self.options).and_then(
            |(end, results)| {
                self.pos = end;
                let span = Span::new(start, end);
                let mut declarations = Vec::new();
                for statement in results.tokens() {
                    declarations.extend(statement_to_declarations(statement, span)?);
                }
                Ok(declarations)
            },
        );
        match &outcome {
            Err(e) if self.pos == start => self.recover(e),
            _ => {}
        }
        Some(outcome)
    }

    /// Skip past the next `;` after the failure point, or to the end
    fn recover(&mut self, error: &CdeclError) {
        let from = error.span().map_or(self.pos, |span| span.start.max(self.pos));
        self.pos = match self.source[from..].find(';') {
            Some(idx) => from + idx + 1,
            None => self.source.len(),
        };
        log::debug!("resuming at byte {}", self.pos);
    }
}

/// Every declaration of a single statement, e.g. `double x = 7, y = 9;`.
/// Nothing but whitespace may follow the statement.
pub fn parse_declarations(input: &str) -> CdeclResult<Vec<Declaration>> {
    let (end, results) = parse_at(&declaration(), input, 0, &ParseOptions::anchored())?;
    let span = Span::new(0, end);
    let mut declarations = Vec::new();
    for statement in results.tokens() {
        declarations.extend(statement_to_declarations(statement, span)?);
    }
    Ok(declarations)
}

/// A statement declaring exactly one variable
pub fn parse_declaration(input: &str) -> CdeclResult<Declaration> {
    let mut declarations = parse_declarations(input)?;
    if declarations.len() != 1 {
        return Err(CdeclError::Arity {
            expected: 1,
            found: declarations.len(),
        });
    }
    Ok(declarations.remove(0))
}

/// All declarations of a source text, stopping at the first error
pub fn parse_source(source: &str) -> CdeclResult<Vec<Declaration>> {
    let mut parser = DeclarationParser::new(source);
    let mut declarations = Vec::new();
    while let Some(statement) = parser.next_statement() {
        declarations.extend(statement?);
    }
    Ok(declarations)
}

/// All declarations of a source text, skipping bad statements.
///
/// Each failed statement contributes one error; parsing resumes after the
/// next `;`.
pub fn parse_source_collect(source: &str) -> (Vec<Declaration>, Vec<CdeclError>) {
    let mut parser = DeclarationParser::new(source);
    let mut declarations = Vec::new();
    let mut errors = Vec::new();
    while let Some(statement) = parser.next_statement() {
        match statement {
            Ok(found) => declarations.extend(found),
            Err(e) => errors.push(e),
        }
    }
    (declarations, errors)
}
