use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use varcascade::cli::{Command, USAGE, parse_args, run};
use varcascade_core::logging::targets;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(summary) => {
            tracing::info!(
                target: targets::CLI,
                stylesheets = summary.stylesheets,
                variables = summary.variables,
                warnings = summary.warnings,
                output = %summary.output.display(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(target: targets::CLI, "{e}");
            ExitCode::FAILURE
        }
    }
}
