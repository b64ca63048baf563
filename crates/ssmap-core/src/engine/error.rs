use thiserror::Error;

use super::config::ConfigError;
use super::process::ExecutionError;
use crate::core::io::pdb::PdbError;
use crate::core::models::map::MapError;
use crate::core::models::structure::FrameMismatchError;
use crate::core::parsers::ParseError;

/// How a frame's residues differ from the layout fixed by frame 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyDetail {
    ResidueCount {
        expected: usize,
        found: usize,
    },
    ResidueIdentity {
        position: usize,
        expected: String,
        found: String,
    },
}

impl std::fmt::Display for ConsistencyDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyDetail::ResidueCount { expected, found } => {
                write!(f, "expected {} residues, found {}", expected, found)
            }
            ConsistencyDetail::ResidueIdentity {
                position,
                expected,
                found,
            } => write!(
                f,
                "residue {} changed from {} to {}",
                position, expected, found
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Assignment tool failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Could not parse assignment output: {0}")]
    Parse(#[from] ParseError),

    /// A tool or snapshot failure while processing one trajectory frame.
    #[error("Frame {frame}: {source}")]
    Frame {
        frame: usize,
        #[source]
        source: Box<EngineError>,
    },

    #[error("Residue layout changed at frame {frame}: {detail}")]
    Consistency {
        frame: usize,
        detail: ConsistencyDetail,
    },

    #[error("Map construction failed: {0}")]
    Map(#[from] MapError),

    #[error("Failed to read trajectory frame {frame}: {source}")]
    Trajectory {
        frame: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Selection '{selection}' matches no atoms")]
    EmptySelection { selection: String },

    #[error("Structure file error: {0}")]
    Structure(#[from] PdbError),

    #[error("Frame does not match the selected atoms: {0}")]
    Snapshot(#[from] FrameMismatchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Frame at which a trajectory run failed, when known.
    pub fn frame(&self) -> Option<usize> {
        match self {
            EngineError::Frame { frame, .. }
            | EngineError::Consistency { frame, .. }
            | EngineError::Trajectory { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}
