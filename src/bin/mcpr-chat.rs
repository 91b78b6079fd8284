//! ReplayMod (.mcpr) chat extractor CLI
//!
//! Prints the last chat message sent at or before the earliest marker of a
//! recording. Nothing is printed when no message qualifies; any failure is
//! reported on stderr with a non-zero exit code.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use mcpr_chat::version::supported_versions;
use mcpr_chat::{extract_from_path, render_plain, DEFAULT_REPLAY_FILE};

/// Print the last chat message before the first marker of a ReplayMod recording
#[derive(Parser)]
#[command(name = "mcpr-chat")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the replay file
    #[arg(default_value = DEFAULT_REPLAY_FILE)]
    file: PathBuf,

    /// Render the chat component as plain text instead of raw JSON
    #[arg(long)]
    plain: bool,

    /// List supported Minecraft versions and exit
    #[arg(long)]
    list_versions: bool,

    /// Log progress to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_versions {
        for version in supported_versions() {
            println!("{version}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(text) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
                eprintln!("Error writing output: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> mcpr_chat::Result<String> {
    let Some(line) = extract_from_path(&cli.file)? else {
        return Ok(String::new());
    };

    if cli.plain {
        render_plain(&line.json)
    } else {
        Ok(line.json)
    }
}

/// Sets up stderr logging; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "mcpr_chat=debug",
        _ => "mcpr_chat=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
