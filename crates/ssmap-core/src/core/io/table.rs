use crate::core::analysis::Composition;
use crate::core::models::map::{MapError, SecondaryStructureMap};
use crate::core::models::record::SecondaryStructureRecord;
use serde::Serialize;
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid class id '{value}' at row {row}, column {column}")]
    InvalidValue {
        row: usize,
        column: usize,
        value: String,
    },
    #[error("Malformed map: {0}")]
    Map(#[from] MapError),
}

/// Field separator of a persisted map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
    /// Any run of spaces or tabs. Written as a single space.
    Whitespace,
}

impl Delimiter {
    fn byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
            Delimiter::Whitespace => b' ',
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Whitespace => write!(f, "whitespace"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown delimiter '{0}'. Expected 'tab', 'comma' or 'whitespace'.")]
pub struct ParseDelimiterError(pub String);

impl FromStr for Delimiter {
    type Err = ParseDelimiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tab" | "tsv" => Ok(Delimiter::Tab),
            "comma" | "csv" => Ok(Delimiter::Comma),
            "whitespace" | "space" => Ok(Delimiter::Whitespace),
            _ => Err(ParseDelimiterError(s.to_string())),
        }
    }
}

/// Writes a map as a matrix of numeric class ids, one line per residue and
/// one column per frame.
pub fn write_map(
    map: &SecondaryStructureMap,
    writer: impl Write,
    delimiter: Delimiter,
) -> Result<(), TableError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter.byte())
        .from_writer(writer);
    for row in map.to_id_rows() {
        csv_writer.write_record(row.iter().map(u8::to_string))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a map written by [`write_map`], validating every id and the
/// rectangular shape.
pub fn read_map(reader: impl Read, delimiter: Delimiter) -> Result<SecondaryStructureMap, TableError> {
    let rows = match delimiter {
        Delimiter::Whitespace => read_whitespace_rows(io::BufReader::new(reader))?,
        _ => read_delimited_rows(reader, delimiter.byte())?,
    };
    Ok(SecondaryStructureMap::from_id_rows(&rows)?)
}

fn parse_id(row: usize, column: usize, value: &str) -> Result<u8, TableError> {
    value.trim().parse().map_err(|_| TableError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    })
}

fn read_delimited_rows(reader: impl Read, delimiter: u8) -> Result<Vec<Vec<u8>>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let ids = record
            .iter()
            .enumerate()
            .map(|(column, value)| parse_id(row, column, value))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(ids);
    }
    Ok(rows)
}

fn read_whitespace_rows(reader: impl BufRead) -> Result<Vec<Vec<u8>>, TableError> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = rows.len();
        let ids = line
            .split_whitespace()
            .enumerate()
            .map(|(column, value)| parse_id(row, column, value))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(ids);
    }
    Ok(rows)
}

#[derive(Serialize)]
struct RecordRow<'a> {
    chain: &'a str,
    residue_number: isize,
    residue_name: &'a str,
    code: char,
    class: &'static str,
    phi: f64,
    psi: f64,
    area: f64,
    kappa: f64,
    alpha: f64,
}

/// Writes records as a CSV table with a header line.
pub fn write_records(
    records: &[SecondaryStructureRecord],
    writer: impl Write,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(RecordRow {
            chain: record.chain_id(),
            residue_number: record.residue_number(),
            residue_name: record.residue_name(),
            code: record.code(),
            class: record.class().name(),
            phi: record.phi(),
            psi: record.psi(),
            area: record.area(),
            kappa: record.kappa(),
            alpha: record.alpha(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes an indexed series of fractions, such as class content per frame
/// or per residue, as a two column CSV table.
pub fn write_series(
    values: &[f64],
    index_label: &str,
    value_label: &str,
    writer: impl Write,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([index_label, value_label])?;
    for (index, value) in values.iter().enumerate() {
        csv_writer.write_record([index.to_string(), format!("{:.6}", value)])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct CompositionRow {
    class: &'static str,
    code: char,
    id: u8,
    count: usize,
    fraction: String,
}

/// Writes one row per class, in table order, with its count and fraction.
pub fn write_composition(composition: &Composition, writer: impl Write) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (class, count) in composition.iter() {
        csv_writer.serialize(CompositionRow {
            class: class.name(),
            code: class.code(),
            id: class.id(),
            count,
            fraction: format!("{:.6}", composition.fraction(class)),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
