use std::path::PathBuf;
use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::contacts::ContactParseError;
use crate::core::io::dssp::DsspError;
use crate::core::io::edges::CustomEdgeError;
use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Precondition(String),

    #[error("Failed to read structure: {source}")]
    Structure {
        #[from]
        source: PdbError,
    },

    #[error("Failed to read contact report: {source}")]
    Contacts {
        #[from]
        source: ContactParseError,
    },

    #[error("Failed to read DSSP output: {source}")]
    Dssp {
        #[from]
        source: DsspError,
    },

    #[error("Failed to read custom edges: {source}")]
    CustomEdges {
        #[from]
        source: CustomEdgeError,
    },

    #[error("No {kind} available at {path} and no tool configured to produce it")]
    MissingArtifact { kind: &'static str, path: PathBuf },

    #[error("External tool '{tool}' failed: {reason}")]
    ToolFailed { tool: String, reason: String },

    #[error("Structure contains no nodes after preprocessing")]
    EmptyStructure,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
