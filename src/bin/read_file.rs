use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use file_reader_factory::{install, logging, read_and_print, ReaderConfig};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "read_file")]
#[command(about = "Print a file through the reader registered for its extension")]
#[command(version)]
struct Cli {
    /// File path
    file_path: PathBuf,
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = ReaderConfig::from_env()?;
    install(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    read_and_print(&cli.file_path, &mut out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("{} {err}", "warning:".yellow());
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(path = %cli.file_path.display(), "read failed");
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
