use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Failed to read stdin: {0}")]
    StdinRead(#[from] io::Error),

    #[error("Failed to parse input JSON: {0}")]
    InputParse(#[from] serde_json::Error),

    #[error("Failed to read skill rules from {path}: {source}")]
    RulesRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse skill rules: {0}")]
    RulesParse(String),

    #[error("Home directory not found")]
    NoHomeDir,

    #[error("Failed to write session log {path}: {source}")]
    LogWrite { path: PathBuf, source: io::Error },

    #[error("Failed to serialize log event: {0}")]
    LogSerialize(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;
