//! # AeroDynamics CLI Application
//!
//! Line-oriented calculator over the aero_core formula catalog. Each formula
//! keeps its own session, so switching back and forth preserves edits.
//!
//! ```text
//! aero> use lift-force
//! aero> set v 65
//! aero> insight
//! ```

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use aero_core::insight::{provider_from_config, InsightProvider};
use aero_core::{AeroError, AeroResult, AppConfig, EvaluationSession, FormulaRegistry, InsightOutcome};
use clap::Parser;

#[derive(Parser)]
#[command(name = "aero_cli")]
#[command(about = "Aircraft performance calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Print the formula catalog as JSON and exit
    #[arg(long)]
    json: bool,

    /// Formula to select on startup
    #[arg(short, long)]
    formula: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Interactive state: one session per formula, created on first use.
struct App<'r> {
    registry: &'r FormulaRegistry,
    sessions: HashMap<&'static str, EvaluationSession<'r>>,
    active: &'static str,
}

impl<'r> App<'r> {
    fn new(registry: &'r FormulaRegistry, active: &'static str) -> Self {
        Self {
            registry,
            sessions: HashMap::new(),
            active,
        }
    }

    fn session(&mut self) -> AeroResult<&mut EvaluationSession<'r>> {
        let registry = self.registry;
        let formula = registry.get(self.active)?;
        Ok(self
            .sessions
            .entry(formula.id())
            .or_insert_with(|| EvaluationSession::new(formula)))
    }

    /// Accepts an id or a 1-based catalog number
    fn select(&mut self, key: &str) -> AeroResult<()> {
        let formula = match key.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.registry.len() => &self.registry.list()[n - 1],
            _ => self.registry.get(key)?,
        };
        self.active = formula.id();
        Ok(())
    }
}

fn print_catalog(registry: &FormulaRegistry, active: &str) {
    let mut number = 1;
    for (group, formulas) in registry.groups() {
        println!();
        println!("── {} ──", group.display_name());
        for formula in formulas {
            let marker = if formula.id() == active { "*" } else { " " };
            println!(" {}{:>2}. {:<18} {}", marker, number, formula.id(), formula.title());
            number += 1;
        }
    }
    println!();
}

fn print_session(session: &EvaluationSession<'_>) {
    let formula = session.formula();
    println!("═══════════════════════════════════════");
    println!("  {}", formula.title().to_uppercase());
    println!("═══════════════════════════════════════");
    println!("  {}", formula.formula_text());
    println!();
    println!("{}", formula.description());
    println!();
    println!("Inputs:");
    for field in formula.inputs() {
        let value = session.value(field.id).unwrap_or(field.default_value);
        println!(
            "  {:<5} {:<28} = {:<12} {}",
            field.id,
            format!("{} ({})", field.label, field.symbol),
            value,
            field.unit
        );
    }
    println!();
    println!("Result: {:.4} {}", session.result(), formula.result_unit());
    if session.is_loading() {
        println!("Insight: loading...");
    } else if let Some(insight) = session.insight() {
        println!();
        println!("Insight: {}", insight);
    }
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  list                 Show the formula catalog");
    println!("  use <id|number>      Select a formula");
    println!("  set <input> <value>  Change an input (unparsable text counts as 0)");
    println!("  reset                Restore defaults for the selected formula");
    println!("  show                 Show the selected formula");
    println!("  insight              Ask the AI provider to interpret the result");
    println!("  json                 Print the selected session as JSON");
    println!("  quit                 Exit");
}

fn print_error(error: &AeroError) {
    eprintln!("Error: {}", error);
    if let Ok(json) = serde_json::to_string(error) {
        eprintln!("{}", json);
    }
}

async fn run_command(app: &mut App<'_>, provider: &dyn InsightProvider, line: &str) -> AeroResult<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(true);
    };

    match command {
        "list" | "ls" => print_catalog(app.registry, app.active),
        "use" => match parts.next() {
            Some(key) => {
                app.select(key)?;
                print_session(app.session()?);
            }
            None => println!("usage: use <id|number>"),
        },
        "set" => {
            let Some(id) = parts.next() else {
                println!("usage: set <input> <value>");
                return Ok(true);
            };
            let raw = parts.collect::<Vec<_>>().join(" ");
            let session = app.session()?;
            session.set_input(id, &raw)?;
            println!(
                "{} = {}  →  {:.4} {}",
                id,
                session.value(id).unwrap_or_default(),
                session.result(),
                session.formula().result_unit()
            );
        }
        "reset" => {
            let session = app.session()?;
            session.reset();
            print_session(session);
        }
        "show" => print_session(app.session()?),
        "insight" => {
            let session = app.session()?;
            println!("Requesting insight...");
            match session.request_insight(provider).await {
                InsightOutcome::Stored => {
                    println!();
                    println!("Insight: {}", session.insight().unwrap_or_default());
                }
                InsightOutcome::Discarded => println!("Inputs changed; insight discarded."),
                InsightOutcome::Busy => println!("An insight request is already running."),
            }
        }
        "json" => {
            let snapshot = app.session()?.snapshot();
            if let Ok(json) = serde_json::to_string_pretty(&snapshot) {
                println!("{}", json);
            }
        }
        "help" | "?" => print_help(),
        "quit" | "exit" | "q" => return Ok(false),
        other => println!("Unknown command '{}'. Type 'help'.", other),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    // A broken catalog is fatal: never run with a partial registry
    let registry = match FormulaRegistry::standard() {
        Ok(registry) => registry,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        return match serde_json::to_string_pretty(registry.list()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };
    let provider = match provider_from_config(&config.insight) {
        Ok(provider) => provider,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    let Some(first) = registry.list().first() else {
        eprintln!("Error: formula catalog is empty");
        return ExitCode::FAILURE;
    };
    let mut app = App::new(&registry, first.id());
    if let Some(key) = &cli.formula {
        if let Err(e) = app.select(key) {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    }

    println!("AeroDynamics - Aircraft Performance Calculator");
    println!("==============================================");
    println!("Units: {}. Type 'help' for commands.", config.unit_system);
    print_catalog(&registry, app.active);
    if let Ok(session) = app.session() {
        print_session(session);
    }

    let stdin = io::stdin();
    loop {
        print!("aero> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        match run_command(&mut app, provider.as_ref(), line.trim()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => print_error(&e),
        }
    }

    ExitCode::SUCCESS
}
