use ssmap::core::io::pdb::PdbError;
use ssmap::core::io::table::TableError;
use ssmap::core::models::map::IndexError;
use ssmap::core::parsers::ParseError;
use ssmap::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

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

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn file_parsing<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CliError::FileParsing {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<IndexError> for CliError {
    fn from(e: IndexError) -> Self {
        CliError::Argument(e.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        match e {
            TableError::Io(io) => CliError::Io(io),
            other => CliError::Other(other.into()),
        }
    }
}

impl From<PdbError> for CliError {
    fn from(e: PdbError) -> Self {
        CliError::Core(EngineError::Structure(e))
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Core(EngineError::Parse(e))
    }
}
