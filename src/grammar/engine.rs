//! Matching engine
//!
//! Walks an [`Expr`] tree over the input text. Terminals are recognised
//! with `nom` primitives on the remaining input slice; composites are
//! interpreted here. Positions are byte indexes into the input until an
//! error escapes to the caller, at which point they become a
//! [`ParseError`] with character offset, line and column.

use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char as nom_char, satisfy};
use nom::combinator::recognize;
use nom::sequence::pair;
use nom::IResult;

use super::chars::CharSet;
use super::expr::{Expr, ExprKind};
use super::results::{ParseResults, Value};
use crate::error::{ActionError, CdeclError, CdeclResult, ParseError, Span};

/// Characters skipped before each expression unless told otherwise
pub const DEFAULT_WHITESPACE: &str = " \t\r\n";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub whitespace: String,
    /// Require the whole input to be consumed
    pub parse_all: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            whitespace: DEFAULT_WHITESPACE.to_string(),
            parse_all: false,
        }
    }
}

impl ParseOptions {
    pub fn anchored() -> Self {
        Self {
            parse_all: true,
            ..Self::default()
        }
    }
}

/// Why a match attempt stopped
#[derive(Debug)]
enum MatchError {
    /// Recoverable; alternation may try something else
    Mismatch { pos: usize, expected: String },
    /// A parse action rejected its tokens; never retried
    Action { message: String, span: Span },
}

type MatchResult = Result<(usize, ParseResults), MatchError>;

struct Matcher<'a> {
    input: &'a str,
    options: &'a ParseOptions,
}

impl<'a> Matcher<'a> {
    fn skip_whitespace(&self, pos: usize) -> usize {
        let rest = &self.input[pos..];
        let ws: IResult<&str, &str> = take_while(|c: char| self.options.whitespace.contains(c))(rest);
        match ws {
            Ok((_, skipped)) => pos + skipped.len(),
            Err(_) => pos,
        }
    }

    fn mismatch(pos: usize, expr: &Expr) -> MatchError {
        MatchError::Mismatch {
            pos,
            expected: expr.to_string(),
        }
    }

    fn parse_expr(&self, expr: &Expr, pos: usize) -> MatchResult {
        let start = if expr.skip_whitespace {
            self.skip_whitespace(pos)
        } else {
            pos
        };
        log::trace!("trying {} at {}", expr, start);

        let (end, mut results) = match &expr.kind {
            ExprKind::Literal(s) => {
                let end = self
                    .match_literal(s, start)
                    .ok_or_else(|| Self::mismatch(start, expr))?;
                (end, ParseResults::from_tokens(vec![Value::from(s.as_str())]))
            }
            ExprKind::OneOf(words) => {
                let best = words
                    .iter()
                    .filter_map(|w| self.match_literal(w, start).map(|end| (end, w)))
                    .max_by_key(|(end, _)| *end)
                    .ok_or_else(|| Self::mismatch(start, expr))?;
                (best.0, ParseResults::from_tokens(vec![Value::from(best.1.as_str())]))
            }
            ExprKind::Word { init, body } => {
                let matched = match_word(&self.input[start..], init, body)
                    .ok_or_else(|| Self::mismatch(start, expr))?;
                (
                    start + matched.len(),
                    ParseResults::from_tokens(vec![Value::from(matched)]),
                )
            }
            ExprKind::QuotedString { quote, escape } => {
                let (len, text) = match_quoted(&self.input[start..], *quote, *escape)
                    .ok_or_else(|| Self::mismatch(start, expr))?;
                (start + len, ParseResults::from_tokens(vec![Value::Str(text)]))
            }
            ExprKind::StringEnd => {
                if start != self.input.len() {
                    return Err(Self::mismatch(start, expr));
                }
                (start, ParseResults::new())
            }
            ExprKind::And(items) => {
                let mut cursor = start;
                let mut results = ParseResults::new();
                for item in items {
                    let (next, item_results) = self.parse_expr(item, cursor)?;
                    cursor = next;
                    results.extend(item_results);
                }
                (cursor, results)
            }
            ExprKind::MatchFirst(items) => self.parse_alternatives(expr, items, start)?,
            ExprKind::Suppress(inner) => {
                let (end, mut results) = self.parse_expr(inner, start)?;
                results.take_tokens();
                (end, results)
            }
            ExprKind::Optional(inner) => match self.parse_expr(inner, start) {
                Ok(found) => found,
                Err(MatchError::Mismatch { .. }) => (pos, ParseResults::new()),
                Err(e) => return Err(e),
            },
            ExprKind::ZeroOrMore(inner) => self.parse_repeated(inner, start, pos)?,
            ExprKind::OneOrMore(inner) => {
                let (first_end, mut results) = self.parse_expr(inner, start)?;
                let (end, rest) = self.parse_repeated(inner, first_end, first_end)?;
                results.extend(rest);
                (end, results)
            }
            ExprKind::Group(inner) => {
                let (end, mut results) = self.parse_expr(inner, start)?;
                let tokens = results.take_tokens();
                results.push(Value::List(tokens));
                (end, results)
            }
        };

        if let Some(action) = &expr.action {
            let tokens = action(results.tokens()).map_err(|message| MatchError::Action {
                message,
                span: Span::new(start, end.max(start)),
            })?;
            results.replace_tokens(tokens);
        }

        if let Some(name) = &expr.results_name {
            let value = match results.tokens() {
                [single] => single.clone(),
                tokens => Value::List(tokens.to_vec()),
            };
            results.set_name(name, value);
        }

        log::trace!("matched {} at {}..{}", expr, start, end);
        Ok((end, results))
    }

    fn match_literal(&self, s: &str, pos: usize) -> Option<usize> {
        let res: IResult<&str, &str> = tag(s)(&self.input[pos..]);
        res.ok().map(|(_, matched)| pos + matched.len())
    }

    /// First alternative that matches wins. If every alternative fails at
    /// the starting position the alternation reports its own label,
    /// otherwise the failure that got furthest.
    fn parse_alternatives(&self, expr: &Expr, items: &[Expr], start: usize) -> MatchResult {
        let mut furthest: Option<(usize, String)> = None;
        for item in items {
            match self.parse_expr(item, start) {
                Ok(found) => return Ok(found),
                Err(MatchError::Mismatch { pos, expected }) => {
                    if furthest.as_ref().map_or(true, |(best, _)| pos > *best) {
                        furthest = Some((pos, expected));
                    }
                }
                Err(e) => return Err(e),
            }
        }

        match furthest {
            Some((pos, expected)) if pos > start => Err(MatchError::Mismatch { pos, expected }),
            _ => Err(Self::mismatch(start, expr)),
        }
    }

    fn parse_repeated(&self, inner: &Expr, start: usize, pos: usize) -> MatchResult {
        let mut cursor = start;
        let mut end = pos;
        let mut results = ParseResults::new();
        loop {
            match self.parse_expr(inner, cursor) {
                Ok((next, found)) => {
                    if next == cursor {
                        // No progress; stop instead of looping forever
                        break;
                    }
                    cursor = next;
                    end = next;
                    results.extend(found);
                }
                Err(MatchError::Mismatch { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        Ok((end, results))
    }
}

fn match_word<'i>(input: &'i str, init: &CharSet, body: &CharSet) -> Option<&'i str> {
    let res: IResult<&str, &str> = recognize(pair(
        satisfy(|c: char| init.contains(c)),
        take_while(|c: char| body.contains(c)),
    ))(input);
    res.ok().map(|(_, matched)| matched)
}

/// Returns the consumed length (quotes included) and the unescaped text
fn match_quoted(input: &str, quote: char, escape: Option<char>) -> Option<(usize, String)> {
    let opened: IResult<&str, char> = nom_char(quote)(input);
    let (rest, _) = opened.ok()?;

    let mut text = String::new();
    let mut chars = rest.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if Some(ch) == escape {
            let (_, escaped) = chars.next()?;
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                'f' => '\x0c',
                other => other,
            });
        } else if ch == quote {
            let consumed = input.len() - rest.len() + idx + ch.len_utf8();
            return Some((consumed, text));
        } else {
            text.push(ch);
        }
    }

    // Unterminated
    None
}

/// Match `expr` against `input` with explicit options
pub fn parse_with(expr: &Expr, input: &str, options: &ParseOptions) -> CdeclResult<ParseResults> {
    parse_at(expr, input, 0, options).map(|(_, results)| results)
}

/// Match `expr` starting at byte index `pos` of `input`.
///
/// Returns the byte index where the match ended along with the results.
/// Error locations are reported relative to the whole input.
pub fn parse_at(
    expr: &Expr,
    input: &str,
    pos: usize,
    options: &ParseOptions,
) -> CdeclResult<(usize, ParseResults)> {
    if !input.is_char_boundary(pos) {
        return Err(CdeclError::Other(format!(
            "position {} is not on a character boundary",
            pos
        )));
    }
    let matcher = Matcher { input, options };

    let outcome = matcher.parse_expr(expr, pos).and_then(|(end, results)| {
        if options.parse_all {
            let rest = matcher.skip_whitespace(end);
            if rest != input.len() {
                return Err(MatchError::Mismatch {
                    pos: rest,
                    expected: "end of text".to_string(),
                });
            }
        }
        Ok((end, results))
    });

    outcome.map_err(|e| match e {
        MatchError::Mismatch { pos, expected } => {
            let err = ParseError::new(expected, input, pos);
            log::debug!("parse failed: {}", err);
            CdeclError::Parse(err)
        }
        MatchError::Action { message, span } => {
            CdeclError::Action(ActionError::new(message, input, span))
        }
    })
}

impl Expr {
    /// Match at the start of `input`; trailing text is ignored
    pub fn parse_string(&self, input: &str) -> CdeclResult<ParseResults> {
        parse_with(self, input, &ParseOptions::default())
    }

    /// Match and require that nothing but whitespace follows
    pub fn parse_string_all(&self, input: &str) -> CdeclResult<ParseResults> {
        parse_with(self, input, &ParseOptions::anchored())
    }

    pub fn matches(&self, input: &str) -> bool {
        self.parse_string(input).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::expr::*;
    use pretty_assertions::assert_eq;

    fn ident() -> Expr {
        word(CharSet::alphas(), CharSet::alphanums() + "_")
    }

    #[test]
    fn test_literal_skips_leading_whitespace() {
        let results = literal("int").parse_string("   int").unwrap();
        assert_eq!(results.to_string(), "['int']");
    }

    #[test]
    fn test_partial_match_succeeds() {
        let results = literal("int").parse_string("int x").unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_string_all_rejects_trailing_text() {
        let err = literal("int").parse_string_all("int x").unwrap_err();
        assert_eq!(err.to_string(), "Expected end of text (at char 4), (line:1, col:5)");
    }

    #[test]
    fn test_one_of_prefers_longest() {
        let expr = one_of(&["int", "integer"]);
        assert_eq!(expr.parse_string("integer").unwrap()[0], Value::from("integer"));
        assert_eq!(expr.parse_string("int").unwrap()[0], Value::from("int"));
    }

    #[test]
    fn test_match_first_is_ordered() {
        let expr = literal("int") | literal("integer");
        assert_eq!(expr.parse_string("integer").unwrap()[0], Value::from("int"));
    }

    #[test]
    fn test_word() {
        let results = ident().parse_string("snake_case9 rest").unwrap();
        assert_eq!(results[0], Value::from("snake_case9"));
        assert!(!ident().matches("9lives"));
    }

    #[test]
    fn test_quoted_string_unescapes() {
        let expr = quoted_string('"', Some('\\'));
        let results = expr.parse_string(r#""a \"b\" c\n" tail"#).unwrap();
        assert_eq!(results[0], Value::from("a \"b\" c\n"));
    }

    #[test]
    fn test_quoted_string_unterminated() {
        let expr = quoted_string('"', Some('\\'));
        let err = expr.parse_string(r#""never closed"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected string enclosed in '\"' (at char 0), (line:1, col:1)"
        );
    }

    #[test]
    fn test_sequence_reports_failing_element() {
        let expr = ident() + literal("=") + ident();
        let err = expr.parse_string("a = ;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected W:(A-Za-z, A-Za-z0-9_) (at char 4), (line:1, col:5)"
        );
    }

    #[test]
    fn test_alternation_reports_furthest_failure() {
        let expr = (literal("a") + literal("b")) | literal("c");
        let err = expr.parse_string("a x").unwrap_err();
        assert_eq!(err.to_string(), "Expected \"b\" (at char 2), (line:1, col:3)");
    }

    #[test]
    fn test_error_location_on_second_line() {
        let expr = literal("int") + literal(";");
        let err = expr.parse_string("int\n  x").unwrap_err();
        assert_eq!(err.to_string(), "Expected \";\" (at char 6), (line:2, col:3)");
    }

    #[test]
    fn test_suppress_drops_tokens_keeps_names() {
        let expr = suppress(ident().set_results_name("name")) + literal(";");
        let results = expr.parse_string("abc;").unwrap();
        assert_eq!(results.to_string(), "[';']");
        assert_eq!(results.get_str("name"), Some("abc"));
    }

    #[test]
    fn test_parse_action_replaces_tokens() {
        let number = word1(CharSet::nums()).set_parse_action(|t| {
            let n: i64 = t[0].to_string().parse().map_err(|e| format!("{}", e))?;
            Ok(vec![Value::Int(n * 2)])
        });
        assert_eq!(number.parse_string("21").unwrap()[0], Value::Int(42));
    }

    #[test]
    fn test_parse_action_error_is_not_retried() {
        let failing = literal("a").set_parse_action(|_| Err("rejected".to_string()));
        let expr = failing | literal("a");
        let err = expr.parse_string("a").unwrap_err();
        assert!(matches!(err, CdeclError::Action(_)));
        assert_eq!(err.to_string(), "rejected (at char 0), (line:1, col:1)");
    }

    #[test]
    fn test_action_span_on_empty_optional() {
        let expr = literal("a") + optional(literal("x")).set_parse_action(|_| Err("empty".to_string()));
        match expr.parse_string("a   y").unwrap_err() {
            CdeclError::Action(e) => {
                assert_eq!(e.span, Span::new(4, 4));
                assert_eq!(e.offset, 4);
            }
            other => panic!("Expected action error, got {:?}", other),
        }
    }

    #[test]
    fn test_results_name_with_several_tokens_is_list() {
        let expr = (ident() + ident()).set_results_name("pair");
        let results = expr.parse_string("a b").unwrap();
        assert_eq!(
            results.get("pair"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_repetition_and_group() {
        let list = delimited_list(group(ident() + suppress(literal("=")) + ident()), ",");
        let results = list.parse_string("a = b, c = d").unwrap();
        assert_eq!(results.to_string(), "[['a', 'b'], ['c', 'd']]");
    }

    #[test]
    fn test_optional_and_one_or_more() {
        let expr = optional(literal("-")) + one_or_more(word1(CharSet::nums()));
        assert_eq!(expr.parse_string("- 1 2 3").unwrap().len(), 4);
        assert_eq!(expr.parse_string("1").unwrap().len(), 1);
        assert!(!expr.matches("-"));
    }

    #[test]
    fn test_leave_whitespace() {
        let expr = literal("a") + literal("b").leave_whitespace();
        assert!(expr.matches("ab"));
        assert!(!expr.matches("a b"));
    }

    #[test]
    fn test_parse_at_reports_absolute_location() {
        let expr = literal("int") + literal(";");
        let input = "int;\nint x";
        let (end, _) = parse_at(&expr, input, 0, &ParseOptions::default()).unwrap();
        assert_eq!(end, 4);
        let err = parse_at(&expr, input, end, &ParseOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Expected \";\" (at char 9), (line:2, col:5)");
    }

    #[test]
    fn test_custom_whitespace() {
        let options = ParseOptions {
            whitespace: " ".to_string(),
            parse_all: false,
        };
        let expr = literal("a") + literal("b");
        assert!(parse_with(&expr, "a b", &options).is_ok());
        assert!(parse_with(&expr, "a\nb", &options).is_err());
    }
}
