//! Parsers turning the text output of the external assignment tools into
//! [`SecondaryStructureRecord`]s.
//!
//! Both dialects share one contract, raw text in and ordered records out,
//! selected at runtime through [`AssignmentTool`]:
//!
//! - [`stride`] - Whitespace separated `ASG` records written by STRIDE
//! - [`dssp`] - The fixed-column residue table of classic DSSP output

pub mod dssp;
pub mod stride;

use crate::core::models::record::SecondaryStructureRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The external secondary structure assignment program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentTool {
    #[default]
    Stride,
    Dssp,
}

impl AssignmentTool {
    /// Parses one complete output of this tool.
    ///
    /// Lines that do not describe a residue (headers, summaries, chain
    /// breaks) are skipped. An output without residue lines yields an empty
    /// vector.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for the first residue line that cannot be
    /// parsed or that carries an unknown secondary structure code.
    pub fn parse(self, output: &str) -> Result<Vec<SecondaryStructureRecord>, ParseError> {
        match self {
            AssignmentTool::Stride => stride::parse(output),
            AssignmentTool::Dssp => dssp::parse(output),
        }
    }
}

impl fmt::Display for AssignmentTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentTool::Stride => write!(f, "STRIDE"),
            AssignmentTool::Dssp => write!(f, "DSSP"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown assignment tool '{0}'. Expected 'stride' or 'dssp'.")]
pub struct ParseToolError(pub String);

impl FromStr for AssignmentTool {
    type Err = ParseToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stride" => Ok(AssignmentTool::Stride),
            "dssp" | "mkdssp" => Ok(AssignmentTool::Dssp),
            _ => Err(ParseToolError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{tool} output line {line_number}: {kind}\n  > {line}")]
pub struct ParseError {
    pub tool: AssignmentTool,
    pub line_number: usize,
    pub line: String,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Line is too short for a residue record (must be at least {expected} chars)")]
    LineTooShort { expected: usize },
    #[error("Invalid integer in {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float in {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Unrecognized secondary structure code '{0}'")]
    UnknownCode(String),
}

fn parse_int(field: &'static str, value: &str) -> Result<isize, ParseErrorKind> {
    value.trim().parse().map_err(|_| ParseErrorKind::InvalidInt {
        field,
        value: value.trim().to_string(),
    })
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, ParseErrorKind> {
    value.trim().parse().map_err(|_| ParseErrorKind::InvalidFloat {
        field,
        value: value.trim().to_string(),
    })
}
