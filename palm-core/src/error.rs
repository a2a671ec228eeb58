use std::path::PathBuf;

use thiserror::Error;

/// A single form field that could not be turned into a parameter value.
///
/// These are never fatal: the parameter keeps its last valid value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("{field}: `{input}` is not a valid number")]
    InvalidNumber { field: &'static str, input: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter file: {0}")]
    Toml(#[from] toml::de::Error),
}
