use std::collections::BTreeMap;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use accesslog_parser::{AccessLogMessage, AccessLogReader, LogParseError};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect directory server access logs.
#[derive(Parser)]
#[command(name = "accesslog", version)]
struct Args {
    /// Log files to read; standard input when none are given
    files: Vec<PathBuf>,

    /// What to print for the parsed messages
    #[arg(long, value_enum, default_value = "summary")]
    output: OutputFormat,

    /// Stop at the first unparsable line instead of skipping it
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON object per message
    Json,
    /// Message counts per type
    Summary,
}

#[derive(Default)]
struct Tally {
    parsed: BTreeMap<String, u64>,
    failed: u64,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accesslog_cli=info,accesslog_parser=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(tally) => {
            if args.output == OutputFormat::Summary {
                print_summary(&tally);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("accesslog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Tally, LogParseError> {
    let mut tally = Tally::default();
    if args.files.is_empty() {
        let reader = AccessLogReader::new(io::stdin().lock());
        drain(reader, args, &mut tally)?;
    } else {
        for path in &args.files {
            tracing::info!(path = %path.display(), "reading access log");
            let reader = AccessLogReader::open(path)?;
            drain(reader, args, &mut tally)?;
        }
    }
    Ok(tally)
}

fn drain<R: BufRead>(
    mut reader: AccessLogReader<R>,
    args: &Args,
    tally: &mut Tally,
) -> Result<(), LogParseError> {
    loop {
        match reader.read() {
            Ok(Some(message)) => {
                if args.output == OutputFormat::Json {
                    print_json(&message);
                }
                *tally.parsed.entry(label(&message)).or_insert(0) += 1;
            }
            Ok(None) => return Ok(()),
            Err(e) if args.strict => return Err(e),
            Err(e) => {
                tally.failed += 1;
                tracing::warn!(error = %e, "skipping unparsable line");
            }
        }
    }
}

fn label(message: &AccessLogMessage) -> String {
    match message.operation_type() {
        Some(op) => format!(
            "{} {}",
            op.log_identifier(),
            message.message_type().log_identifier()
        ),
        None => message.message_type().log_identifier().to_string(),
    }
}

fn print_json(message: &AccessLogMessage) {
    let value = serde_json::json!({
        "timestamp": message.timestamp(),
        "label": label(message),
        "message": message,
    });
    println!("{value}");
}

fn print_summary(tally: &Tally) {
    for (label, count) in &tally.parsed {
        println!("{count:>8}  {label}");
    }
    if tally.failed > 0 {
        println!("{:>8}  (unparsable lines)", tally.failed);
    }
}
