mod commands;
mod error;
pub mod exit_codes;
pub mod output;

pub use commands::{Cli, Commands, ConfigCommands, ContextArgs};
pub use error::CommandError;

use output::OutputMode;

pub fn run(cli: Cli) -> Result<(), CommandError> {
    commands::execute(cli)
}

/// print a command error the way the output mode asks for
///
/// JSON errors go to stdout so a consumer reading the result stream sees them,
/// text errors go to stderr
pub fn report_error(err: &CommandError, mode: OutputMode) {
    if mode.is_json() {
        output::print_json_error(err.code, &err.message, err.kind, err.suggestions.clone());
        return;
    }

    eprintln!("error: {}", err.message);
    if err.has_suggestions() {
        eprintln!("did you mean: {}?", err.suggestions.join(", "));
    }
}
