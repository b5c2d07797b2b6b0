use clap::Parser;
use rulekit::cli::{self, exit_codes, Cli};
use rulekit::logging;

fn main() {
    // handle broken pipe gracefully (e.g., when piping to `head` or `jq` that exits early)
    reset_sigpipe();

    // clap's own usage errors exit with 2, which is FORMAT_ERROR here
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        let code = if e.use_stderr() {
            exit_codes::INVALID_ARGS
        } else {
            exit_codes::SUCCESS
        };
        std::process::exit(code);
    });
    logging::init(cli.verbose);

    let output_mode = cli.output_mode();
    if let Err(e) = cli::run(cli) {
        cli::report_error(&e, output_mode);
        std::process::exit(e.code);
    }
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
