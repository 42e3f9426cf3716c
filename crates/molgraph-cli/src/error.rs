use crate::utils::parser::ParseError;
use molgraph::engine::error::GraphError;
use molgraph::workflows::ppi::PpiError;
use molgraph::workflows::rna::RnaError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("RNA graph error: {0}")]
    Rna(#[from] RnaError),

    #[error("Interaction network error: {0}")]
    Ppi(#[from] PpiError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Config(e.to_string())
    }
}
