//! Guided walk-through of the grammar features
//!
//! Each [`Lesson`] runs one grammar from [`crate::decl::grammars`] on a
//! fixed input and records what it printed. Lessons that demonstrate a
//! failure print the parse error instead of stopping the walk-through.

use std::fmt::Write as _;

use crate::decl::grammars::{
    anchored, c_assignment, c_statement, c_statement_with_action, multi_declaration,
    named_assignment, named_statement, string_definition,
};
use crate::error::{CdeclError, CdeclResult};
use crate::grammar::Value;

type LessonFn = fn(&str) -> CdeclResult<Vec<String>>;

/// One step of the walk-through
pub struct Lesson {
    pub title: &'static str,
    pub input: &'static str,
    /// Whether the lesson is meant to show a parse error
    pub expect_failure: bool,
    run: LessonFn,
}

/// What a lesson printed
#[derive(Debug, Clone, PartialEq)]
pub struct LessonReport {
    pub title: &'static str,
    pub input: &'static str,
    pub output: Vec<String>,
    pub failed: bool,
    pub as_expected: bool,
}

impl Lesson {
    pub fn run(&self) -> LessonReport {
        log::debug!("running lesson '{}'", self.title);
        let (output, failed) = match (self.run)(self.input) {
            Ok(lines) => (lines, false),
            Err(e) => (vec![e.to_string()], true),
        };
        LessonReport {
            title: self.title,
            input: self.input,
            output,
            failed,
            as_expected: failed == self.expect_failure,
        }
    }
}

fn strings(values: impl IntoIterator<Item = Value>) -> Vec<String> {
    values.into_iter().map(|v| v.to_string()).collect()
}

fn token_list(input: &str) -> CdeclResult<Vec<String>> {
    Ok(vec![c_assignment().parse_string(input)?.to_string()])
}

fn named_access(input: &str) -> CdeclResult<Vec<String>> {
    let results = named_assignment().parse_string(input)?;
    ["type", "new_identifier", "rhs"]
        .iter()
        .map(|name| results.require(name).map(|v| v.to_string()))
        .collect()
}

fn suppressed(input: &str) -> CdeclResult<Vec<String>> {
    let [t, id, rhs] = c_statement().parse_string(input)?.into_array::<3>()?;
    Ok(strings([t, id, rhs]))
}

fn quoted(input: &str) -> CdeclResult<Vec<String>> {
    let [keyword, id, string] = string_definition().parse_string(input)?.into_array::<3>()?;
    Ok(strings([keyword, id, string]))
}

fn converted(input: &str) -> CdeclResult<Vec<String>> {
    let [_, _, rhs] = c_statement_with_action().parse_string(input)?.into_array::<3>()?;
    let value = rhs
        .as_float()
        .ok_or_else(|| CdeclError::Other(format!("{} is not a number", rhs.repr())))?;
    Ok(vec![rhs.to_string(), Value::Float(value * 2.0).to_string()])
}

fn dumped(input: &str) -> CdeclResult<Vec<String>> {
    let dump = named_statement().parse_string(input)?.dump();
    Ok(dump.lines().map(str::to_string).collect())
}

fn unanchored(input: &str) -> CdeclResult<Vec<String>> {
    Ok(vec![named_statement().parse_string(input)?.to_string()])
}

fn with_anchor(input: &str) -> CdeclResult<Vec<String>> {
    Ok(vec![anchored(named_statement()).parse_string(input)?.to_string()])
}

fn several(input: &str) -> CdeclResult<Vec<String>> {
    Ok(vec![multi_declaration().parse_string(input)?.to_string()])
}

/// The walk-through, in order
pub fn lessons() -> Vec<Lesson> {
    vec![
        Lesson {
            title: "Sequencing keywords, identifiers and numbers",
            input: "double x = 7;",
            expect_failure: false,
            run: token_list,
        },
        Lesson {
            title: "Whitespace between tokens is free-form",
            input: " double x=7; ",
            expect_failure: false,
            run: token_list,
        },
        Lesson {
            title: "Input that does not fit the grammar",
            input: "x=7",
            expect_failure: true,
            run: token_list,
        },
        Lesson {
            title: "The right-hand side may be another identifier",
            input: "double x= y;",
            expect_failure: false,
            run: token_list,
        },
        Lesson {
            title: "Valid C the grammar does not cover",
            input: "double x = 7, y = 9;",
            expect_failure: true,
            run: token_list,
        },
        Lesson {
            title: "Named results",
            input: "double x = 7;",
            expect_failure: false,
            run: named_access,
        },
        Lesson {
            title: "Suppressing punctuation",
            input: "double x = 7;",
            expect_failure: false,
            run: suppressed,
        },
        Lesson {
            title: "Quoted strings with escaped quotes",
            input: r#"char* s="he said \"hello friend!\"";"#,
            expect_failure: false,
            run: quoted,
        },
        Lesson {
            title: "Parse actions convert tokens",
            input: "double x = 3.14;",
            expect_failure: false,
            run: converted,
        },
        Lesson {
            title: "Dumping named results",
            input: "double x = 3.14;",
            expect_failure: false,
            run: dumped,
        },
        Lesson {
            title: "Trailing garbage is ignored by default",
            input: "double x = 3.14; random syntactically incorrect garbage",
            expect_failure: false,
            run: unanchored,
        },
        Lesson {
            title: "Anchoring at the end of input",
            input: "double x = 3.14; random garbage",
            expect_failure: true,
            run: with_anchor,
        },
        Lesson {
            title: "Several declarators in one statement",
            input: "double x = 7, y = 9;",
            expect_failure: false,
            run: several,
        },
    ]
}

pub fn run_all() -> Vec<LessonReport> {
    lessons().iter().map(Lesson::run).collect()
}

/// Console rendering of lesson reports
pub fn render(reports: &[LessonReport]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}. {}", i + 1, report.title);
        let _ = writeln!(out, "   input: {:?}", report.input);
        for line in &report.output {
            let _ = writeln!(out, "   {}", line);
        }
    }
    out
}
