use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use colored::Colorize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use cdecl::decl::grammars;
use cdecl::decl::{parse_declarations, parse_source_collect};
use cdecl::error::ErrorCollector;
use cdecl::grammar::{Expr, ParseOptions};
use cdecl::tutorial;

#[derive(Parser)]
#[command(name = "cdecl")]
#[command(author, version, about = "Parse tiny C declarations with grammar combinators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GrammarKind {
    /// Every token kept: type identifier = rhs ;
    #[value(name = "assignment")]
    Assignment,
    /// Tokens named type, new_identifier and rhs
    #[value(name = "named")]
    Named,
    /// '=' and ';' suppressed
    #[value(name = "statement")]
    Statement,
    /// Suppressed punctuation, numbers converted to floats
    #[value(name = "action")]
    Action,
    /// Named type, identifier and number with float conversion
    #[value(name = "dump")]
    Dump,
    /// char* identifier = "text";
    #[value(name = "string")]
    String,
    /// Several declarators: double x = 7, y = 9;
    #[value(name = "multi")]
    Multi,
}

impl GrammarKind {
    fn expr(self) -> Expr {
        match self {
            GrammarKind::Assignment => grammars::c_assignment(),
            GrammarKind::Named => grammars::named_assignment(),
            GrammarKind::Statement => grammars::c_statement(),
            GrammarKind::Action => grammars::c_statement_with_action(),
            GrammarKind::Dump => grammars::named_statement(),
            GrammarKind::String => grammars::string_definition(),
            GrammarKind::Multi => grammars::multi_declaration(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Token list
    #[value(name = "list")]
    List,
    /// Token list plus named results
    #[value(name = "dump")]
    Dump,
    /// JSON object with tokens and named results
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the grammar features step by step
    Demo,

    /// Parse a single declaration with one of the grammars
    Parse {
        /// The text to parse
        text: String,

        /// Which grammar to use
        #[arg(short, long, value_enum, default_value = "assignment")]
        grammar: GrammarKind,

        /// How to print the results
        #[arg(short, long, value_enum, default_value = "list")]
        format: OutputFormat,

        /// Reject trailing text after the declaration
        #[arg(long)]
        anchored: bool,
    },

    /// Parse a file of declarations and report every bad statement
    Check {
        /// The source file to check
        input: PathBuf,

        /// Print the declarations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read declarations interactively
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Verbose raises the default filter; RUST_LOG still wins when set
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Demo => demo(),
        Commands::Parse {
            text,
            grammar,
            format,
            anchored,
        } => parse(&text, grammar, format, anchored),
        Commands::Check { input, json } => check(input, json),
        Commands::Repl => repl(),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn demo() -> Result<()> {
    let reports = tutorial::run_all();
    print!("{}", tutorial::render(&reports));

    let unexpected: Vec<_> = reports.iter().filter(|r| !r.as_expected).collect();
    if !unexpected.is_empty() {
        for report in &unexpected {
            log::warn!("lesson '{}' did not behave as described", report.title);
        }
        anyhow::bail!("{} lesson(s) misbehaved", unexpected.len());
    }
    Ok(())
}

fn parse(text: &str, grammar: GrammarKind, format: OutputFormat, anchored: bool) -> Result<()> {
    log::info!("Parsing {:?} with the {:?} grammar", text, grammar);

    let options = if anchored {
        ParseOptions::anchored()
    } else {
        ParseOptions::default()
    };
    let results = cdecl::grammar::parse_with(&grammar.expr(), text, &options)?;

    match format {
        OutputFormat::List => println!("{}", results),
        OutputFormat::Dump => println!("{}", results.dump()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

/// Source file registered for diagnostics
struct CheckState {
    files: SimpleFiles<String, String>,
    file_id: usize,
}

impl CheckState {
    fn new(input: &Path) -> Result<(Self, String)> {
        let source = fs::read_to_string(input)
            .with_context(|| format!("Failed to read source file: {:?}", input))?;

        let mut files = SimpleFiles::new();
        let file_id = files.add(input.display().to_string(), source.clone());

        Ok((Self { files, file_id }, source))
    }

    fn report_error(&self, diagnostic: &Diagnostic<usize>) -> Result<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
        Ok(())
    }
}

fn check(input: PathBuf, json: bool) -> Result<()> {
    log::info!("Checking {:?}", input);

    let (state, source) = CheckState::new(&input)?;
    let (declarations, errors) = parse_source_collect(&source);

    let mut collector = ErrorCollector::new();
    for error in errors {
        collector.add_error(error, state.file_id);
    }

    if collector.has_errors() {
        for error in collector.errors() {
            state.report_error(&error.to_diagnostic())?;
        }
        anyhow::bail!("{} bad statement(s) in {:?}", collector.error_count(), input);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&declarations)?);
    } else {
        for decl in &declarations {
            println!("{}", decl);
        }
    }
    println!(
        "{}: {} declaration(s) found",
        "success".green().bold(),
        declarations.len()
    );
    Ok(())
}

fn repl() -> Result<()> {
    println!("{}", "cdecl REPL".blue().bold());
    println!("Type ':quit' or ':q' to exit, ':help' for help\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    let mut line_number = 1;

    loop {
        print!("cdecl:{:03}> ", line_number);
        stdout.flush()?;

        let input = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = input.trim();

        match input {
            ":quit" | ":q" => {
                println!("Goodbye!");
                break;
            }
            ":help" | ":h" => {
                println!("REPL commands:");
                println!("  :quit, :q    Exit the REPL");
                println!("  :help, :h    Show this help message");
                println!("\nEnter declarations such as `double x = 7;` to parse them.");
                continue;
            }
            "" => continue,
            _ => {}
        }

        match parse_declarations(input) {
            Ok(declarations) => {
                for decl in declarations {
                    println!("{}: {}", "ok".green(), decl);
                }
            }
            Err(e) => eprintln!("{}: {}", "error".red(), e),
        }

        line_number += 1;
    }

    Ok(())
}
