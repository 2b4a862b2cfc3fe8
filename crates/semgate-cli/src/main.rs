//! semgate CLI
//!
//! Release gate: fails when the declared version bump between two builds of
//! a JVM library is smaller than its API changes require.

use clap::error::ErrorKind;
use clap::Parser;
use semgate_core::logging_facility::{init, Profile};

mod commands;

const LOG_FORMAT_ENV: &str = "SEMGATE_LOG_FORMAT";

#[derive(Debug, Parser)]
#[command(name = "semgate", version)]
#[command(
    about = "Check that a declared version bump covers the API changes between two jar/aar builds",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    check: commands::check::CheckArgs,
}

/// Single-line form of a clap error: drop the usage block and `error:` prefix
fn one_line(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let body = rendered.split("\n\nUsage:").next().unwrap_or(&rendered);
    let body = body.trim().trim_start_matches("error:").trim();
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // help and version go to stdout
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("ERROR: {}", one_line(&e));
            eprintln!("INFO: Try --help for usage information");
            std::process::exit(1);
        }
    };

    init(Profile::from_format(std::env::var(LOG_FORMAT_ENV).ok().as_deref()));

    let code = match commands::check::execute(cli.check) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            if e.kind().is_input_error() {
                eprintln!("INFO: Try --help for usage information");
            }
            1
        }
    };
    std::process::exit(code);
}
