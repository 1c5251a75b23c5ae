//! Voice Gate - Entry Point
//!
//! Runs the command interpreter over a transcript given on the command line,
//! or over stdin one line at a time, and prints each decision as JSON.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use voice_gate::command::{CommandInterpreter, GateDecision, ThresholdTable};
use voice_gate::core::error::Result;
use voice_gate::core::logging::init_logging;
use voice_gate::core::InterpreterConfig;

/// Classify spoken spreadsheet commands through a completion API
#[derive(Parser, Debug)]
#[command(name = "voice-gate")]
#[command(about = "Turn voice command transcripts into gated spreadsheet actions")]
struct Args {
    /// Transcript to interpret; reads stdin line by line when omitted
    transcript: Vec<String>,

    /// Chat model (overrides OPENAI_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Completion endpoint (overrides LLM_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// TOML confidence threshold table (overrides VOICE_GATE_THRESHOLDS)
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_file.as_deref());

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("voice-gate: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = InterpreterConfig::from_env()?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(url) = args.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = &args.thresholds {
        config = config.with_thresholds(ThresholdTable::load(path)?);
    }

    tracing::info!(model = %config.model, api_url = %config.api_url, "Voice Gate starting");

    let rt = Runtime::new()?;
    let interpreter = CommandInterpreter::from_config(config)?;

    if !args.transcript.is_empty() {
        let transcript = args.transcript.join(" ");
        let decision = rt.block_on(interpreter.interpret(&transcript));
        print_decision(&decision, args.pretty)?;
        return Ok(if decision.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let stdin = io::stdin();
    for line in transcript_lines(stdin.lock()) {
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        let decision = rt.block_on(interpreter.interpret(input));
        print_decision(&decision, args.pretty)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Split input on newlines; invalid UTF-8 is replaced, not fatal
fn transcript_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}

fn print_decision(decision: &GateDecision, pretty: bool) -> Result<()> {
    let value = decision.to_value();
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}
