//! Process-wide logging setup.
//!
//! Everything is logged through `tracing` to stderr, so rendered views on stdout
//! are never interleaved with log lines.

mod log_style;
mod utils;

pub use log_style::{LogStyle, LogStyleParseError, TextColoring, get_log_style_from_env};
pub use utils::{GetFromEnvError, get_from_env};

use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_STYLE_ENV_VAR: &str = "DETECT_CLIENT_LOG_STYLE";
const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global subscriber. Calling it again (e.g. from several tests) is harmless.
pub fn init_logging() {
    let style = match get_log_style_from_env(LOG_STYLE_ENV_VAR) {
        Ok(style) => style.unwrap_or(LogStyle::Text(TextColoring::Auto)),
        Err(e) => {
            eprintln!("Invalid value of {LOG_STYLE_ENV_VAR}, falling back to text logs: {e}");
            LogStyle::Text(TextColoring::Auto)
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match style {
        LogStyle::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogStyle::Text(coloring) => {
            let ansi = match coloring {
                TextColoring::On => true,
                TextColoring::Off => false,
                TextColoring::Auto => std::io::stderr().is_terminal(),
            };
            registry
                .with(fmt::layer().with_ansi(ansi).with_writer(std::io::stderr))
                .try_init()
        }
    };

    if let Err(e) = result {
        tracing::trace!("Logging was already initialized: {e}");
    }
}
