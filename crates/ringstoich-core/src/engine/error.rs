use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::pdb::PdbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Chains differ in atom count ({left} vs {right}); RMSD is undefined")]
    ChainLengthMismatch { left: usize, right: usize },

    #[error(
        "No local RMSD minimum found up to stoichiometry {max_stoichiometry}; try a larger maximum"
    )]
    NoStoichiometryFound { max_stoichiometry: usize },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Structure file error in '{path}': {source}")]
    Format {
        path: String,
        #[source]
        source: PdbError,
    },

    #[error("Superposition of {mobile} onto {target} failed: {reason}")]
    Superposition {
        mobile: String,
        target: String,
        reason: String,
    },

    #[error("Object '{0}' is not loaded in the session")]
    ObjectNotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to export '{path}': {reason}")]
    Export { path: String, reason: String },
}
