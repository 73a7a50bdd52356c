//! Reference CLI harness (spec.md §6): a pattern over whitespace-split
//! words, matched line by line against stdin.
//!
//! Mirrors the teacher's `main.rs` shape: a `clap`-derive `Args`,
//! `run() -> Result<(), Box<dyn Error>>`, and an `ExitCode` chosen by
//! whether `run` failed. The teacher's `Commands::Svg`/`Commands::Table`
//! debugging subcommands survive as a `debug` subcommand; the plain
//! match mode spec.md asks for (`argv[1]` is the pattern, no subcommand
//! name) is the default when `debug` isn't given.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use token_regex::literal::literal_word_factory;
use token_regex::RegularExpression;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// A whitespace-word pattern, matched against each line of stdin.
    /// Ignored (and may be omitted) when `debug` is given instead.
    pattern: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dump the compiled automaton for `pattern` instead of matching stdin.
    Debug {
        #[arg(long)]
        table: bool,
        #[arg(long)]
        svg: bool,
        pattern: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Some(Command::Debug { table, svg, pattern }) => run_debug(&pattern, table, svg),
        None => {
            let pattern = args.pattern.ok_or("a pattern argument is required")?;
            run_match(&pattern)
        }
    }
}

/// Compiles `pattern` and matches it against each line of stdin,
/// splitting every line on whitespace into the token sequence.
fn run_match(pattern: &str) -> Result<(), Box<dyn std::error::Error>> {
    let re = RegularExpression::compile(pattern, &literal_word_factory())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        writeln!(out, "contains: {}", re.apply(&tokens))?;
        writeln!(out, "matches: {}", re.matches(&tokens))?;
    }
    Ok(())
}

/// Developer debugging affordance, not part of spec.md's testable
/// surface: dumps the compiled automaton as a transition table or as a
/// Graphviz SVG (written to `./graph.svg`).
fn run_debug(pattern: &str, table: bool, svg: bool) -> Result<(), Box<dyn std::error::Error>> {
    let re = RegularExpression::compile(pattern, &literal_word_factory())?;

    if table {
        println!("{}", re.transition_table());
    } else if svg {
        std::fs::write("./graph.svg", re.to_graph().to_string())?;
    } else {
        return Err("exactly one of --table or --svg must be given".into());
    }
    Ok(())
}
