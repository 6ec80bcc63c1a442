use std::str::FromStr;
use thiserror::Error;

use crate::utils::{GetFromEnvError, get_from_env};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextColoring {
    On,
    Off,
    Auto,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogStyle {
    Text(TextColoring),
    Json,
}

impl FromStr for LogStyle {
    type Err = LogStyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(LogStyle::Json),
            "text" => Ok(LogStyle::Text(TextColoring::Auto)),
            "text-colored" => Ok(LogStyle::Text(TextColoring::On)),
            "text-uncolored" => Ok(LogStyle::Text(TextColoring::Off)),
            other => Err(LogStyleParseError::UnrecognizedFormat(other.to_owned())),
        }
    }
}

/// Unset variable means "use the default style", which is why this returns an `Option`
pub fn get_log_style_from_env(env_var_name: &str) -> Result<Option<LogStyle>, LogStyleParseError> {
    get_from_env(env_var_name)?
        .map(|val| val.parse())
        .transpose()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogStyleParseError {
    #[error("Unrecognized log style: `{0}`. Expected one of: text, text-colored, text-uncolored, json")]
    UnrecognizedFormat(String),
    #[error("Env var error: {0}")]
    GetFromEnvError(#[from] GetFromEnvError),
}
