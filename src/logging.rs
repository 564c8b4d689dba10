//! Tracing subscriber initialization.
//!
//! Logs always go to stderr; stdout belongs to the menu, the reports and
//! the progress bar.
//!
//! Filter priority (highest first): the `WAREHOUSE_LOG` env var, `RUST_LOG`,
//! then the level implied by `--verbose` / `--quiet`, defaulting to `warn`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Project-specific filter directives, e.g. `warehouse=debug`.
pub const LOG_ENV_VAR: &str = "WAREHOUSE_LOG";

/// Verbosity level derived from CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// If both flags are set, verbose wins.
    pub const fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: Verbosity) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    // An unparseable WAREHOUSE_LOG falls through instead of failing startup.
    if let Ok(directives) = std::env::var(LOG_ENV_VAR) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::default().add_directive(verbosity.default_level().into())
}
