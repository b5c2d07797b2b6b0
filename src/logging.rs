//! tracing subscriber setup for the rulekit binary
//!
//! log level comes from RULEKIT_LOG (an EnvFilter directive), falling back to
//! "warn". --verbose forces debug output. logs always go to stderr so stdout
//! stays clean for JSON results.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV_VAR: &str = "RULEKIT_LOG";
const DEFAULT_DIRECTIVE: &str = "warn";

/// filter directive for the given flags and RULEKIT_LOG value
pub fn filter_directive(verbose: bool, env_value: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }

    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_DIRECTIVE.to_string(),
    }
}

/// install the global subscriber, a second call is a no-op
pub fn init(verbose: bool) {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let directive = filter_directive(verbose, env_value.as_deref());

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "warning: invalid {} directive '{}', using '{}'",
            LOG_ENV_VAR, directive, DEFAULT_DIRECTIVE
        );
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .try_init();
}
