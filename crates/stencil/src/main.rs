//! Binary entry point for the stencil application generator

use std::process::ExitCode;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return handle_parse_error(&err),
    };

    if let Err(err) = stencil_core::logging::init(None) {
        eprintln!("error: failed to initialize logging: {err:#}");
        return ExitCode::from(1);
    }

    match commands::generate::execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Map clap parse failures onto the generator's historical error surface:
/// help and version go to stdout with exit 0, usage errors print a short
/// `error:` line on stderr plus the usage text on stdout with exit 1.
fn handle_parse_error(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{err}");
            ExitCode::SUCCESS
        }
        ErrorKind::UnknownArgument => {
            eprintln!("error: unknown option {}", offending_arg(err));
            print_usage();
            ExitCode::from(1)
        }
        ErrorKind::InvalidValue if invalid_value(err).is_some_and(str::is_empty) => {
            eprintln!("error: option {} argument missing", offending_arg(err));
            print_usage();
            ExitCode::from(1)
        }
        _ => {
            eprint!("{err}");
            ExitCode::from(1)
        }
    }
}

/// Usage goes to stdout alongside the stderr error line, so a caller that
/// mistyped a flag sees the valid surface without re-running with --help.
fn print_usage() {
    print!("{}", Cli::command().render_help());
}

fn offending_arg(err: &clap::Error) -> String {
    match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => format!("'{arg}'"),
        _ => "'<unknown>'".to_string(),
    }
}

fn invalid_value(err: &clap::Error) -> Option<&str> {
    match err.get(ContextKind::InvalidValue) {
        Some(ContextValue::String(value)) => Some(value.as_str()),
        _ => None,
    }
}
