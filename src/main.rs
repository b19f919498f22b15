use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ocrcalc::calculator::{
    HistoryEntry, Operator, Separator, Session, format_display, parse_batch,
};
use ocrcalc::config::CalcConfig;
use ocrcalc::ocr::{Recognizer, TesseractCli};

mod repl;

/// Add up numbers from screenshots.
#[derive(Parser, Debug)]
#[command(name = "ocrcalc", version, about)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ocrcalc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Thousand separator
    #[arg(long, value_enum, global = true)]
    thousands: Option<Separator>,

    /// Decimal point
    #[arg(long, value_enum, global = true)]
    decimal: Option<Separator>,

    /// Treat every line as exactly one number
    #[arg(long, global = true)]
    row_mode: bool,

    /// Append new batches to the current numbers instead of replacing them
    #[arg(long, global = true)]
    combine: bool,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Input {
    /// File with recognized text; stdin when omitted or "-"
    file: Option<PathBuf>,

    /// Run OCR on this image instead of reading text
    #[arg(long, conflicts_with = "file")]
    image: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the numbers found in the input
    Parse(Input),
    /// Evaluate the numbers found in the input
    Eval {
        #[command(flatten)]
        input: Input,
        /// Operators between the numbers, repeated as needed (e.g. "+*-")
        #[arg(long)]
        ops: Option<String>,
    },
    /// Interactive session on stdin
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Parse(input) => parse(&config, input, cli.json),
        Command::Eval { input, ops } => eval(config, input, ops.as_deref(), cli.json),
        Command::Repl => {
            let mut session = Session::new(config);
            let stdin = io::stdin();
            repl::run(&mut session, stdin.lock(), &mut io::stdout())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(session.history())?);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config file values, overridden by command-line flags.
fn load_config(cli: &Cli) -> Result<CalcConfig> {
    let mut config = CalcConfig::load(cli.config.as_deref())?;

    if let Some(sep) = cli.thousands {
        config.separators.thousand_separator = sep;
    }
    if let Some(sep) = cli.decimal {
        config.separators.decimal_point = sep;
    }
    config.row_mode |= cli.row_mode;
    config.combine_mode |= cli.combine;
    Ok(config)
}

fn read_input(input: &Input) -> Result<String> {
    if let Some(image) = &input.image {
        return TesseractCli::default().recognize(image);
    }

    match &input.file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn parse(config: &CalcConfig, input: &Input, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let batch = parse_batch(&text, &config.separators, config.row_mode);

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    } else if batch.is_empty() {
        eprintln!("No numbers found");
    } else {
        for number in &batch {
            println!("{}", format_display(number.value, &config.separators));
        }
    }
    Ok(())
}

fn eval(config: CalcConfig, input: &Input, ops: Option<&str>, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let operators = ops.map(parse_operators).transpose()?;

    let mut session = Session::new(config);
    let entry = evaluate_text(&mut session, &text, operators.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{}", entry.expression_text(&config.separators));
    }
    Ok(())
}

/// Ingest `text` and evaluate it, with `operators` cycled across the slots
/// when given.
fn evaluate_text<'a>(
    session: &'a mut Session,
    text: &str,
    operators: Option<&[Operator]>,
) -> Result<&'a HistoryEntry> {
    let outcome = session.ingest(text)?;

    match operators {
        Some(operators) if !operators.is_empty() => {
            let slots = session.expression().len().saturating_sub(1);
            for (index, op) in operators.iter().cycle().take(slots).enumerate() {
                session.set_operator(index, *op)?;
            }
            session.evaluate()?;
        }
        _ => {
            outcome.evaluation?;
        }
    }

    session
        .history()
        .recent(0)
        .context("Nothing was evaluated")
}

fn parse_operators(ops: &str) -> Result<Vec<Operator>> {
    ops.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            Operator::from_symbol(&c.to_string())
                .with_context(|| format!("Unknown operator '{c}'"))
        })
        .collect()
}
