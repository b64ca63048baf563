use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{Atom, Frame, Structure, is_protein_residue};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

// Coordinates end at column 54.
const MIN_ATOM_LINE_LENGTH: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: &'static str },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn record_name(line: &str) -> &str {
    slice_and_trim(line, 0, 6)
}

fn is_atom_record(line: &str) -> bool {
    matches!(record_name(line), "ATOM" | "HETATM")
}

// Only the first alternate location is kept, so that structures and
// trajectory frames read from the same file agree on atom indices.
fn is_primary_conformer(line: &str) -> bool {
    matches!(line.as_bytes().get(16), None | Some(b' ') | Some(b'A') | Some(b'1'))
}

fn parse_position(line: &str, line_num: usize) -> Result<Point3<f64>, PdbError> {
    if line.trim_end().len() < MIN_ATOM_LINE_LENGTH {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }
    let coordinate = |start: usize, end: usize, columns: &'static str| {
        let value = slice_and_trim(line, start, end);
        value.parse::<f64>().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns,
                value: value.to_string(),
            },
        })
    };
    Ok(Point3::new(
        coordinate(30, 38, "31-38")?,
        coordinate(38, 46, "39-46")?,
        coordinate(46, 54, "47-54")?,
    ))
}

fn parse_atom(line: &str, line_num: usize, index: usize) -> Result<Atom, PdbError> {
    let position = parse_position(line, line_num)?;

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField { columns: "13-16" },
        });
    }
    let residue_name = slice_and_trim(line, 17, 21);
    if residue_name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField { columns: "18-20" },
        });
    }
    let residue_number_str = slice_and_trim(line, 22, 26);
    let residue_number: isize = residue_number_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26",
            value: residue_number_str.to_string(),
        },
    })?;
    // Serial fields overflow in large MD systems; fall back to the atom count.
    let serial = slice_and_trim(line, 6, 11)
        .parse::<usize>()
        .unwrap_or(index + 1);

    let chain_id = line
        .get(21..22)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ');
    let insertion_code = line
        .get(26..27)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace());
    let element = match slice_and_trim(line, 76, 78) {
        "" => element_from_name(name),
        e => e.to_string(),
    };

    Ok(Atom {
        index,
        serial,
        name: name.to_string(),
        residue_name: residue_name.to_string(),
        chain_id,
        residue_number,
        insertion_code,
        element,
        position,
    })
}

fn element_from_name(name: &str) -> String {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

/// Reader and writer for the ATOM/HETATM records of PDB files.
///
/// Only the first model of a multi-model file is read as a structure; use
/// [`PdbTrajectory`] to iterate over all models.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut atoms = Vec::new();
        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            match record_name(&line) {
                "ATOM" | "HETATM" => {
                    if !is_primary_conformer(&line) {
                        continue;
                    }
                    let atom = parse_atom(&line, line_num, atoms.len())?;
                    atoms.push(atom);
                }
                "ENDMDL" | "END" if !atoms.is_empty() => break,
                _ => {}
            }
        }
        if atoms.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(Structure::new(atoms))
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(
            writer,
            "{:<10}{:<40}{:>9}   {:<4}",
            "HEADER", "SSMAP SNAPSHOT", "", "XXXX"
        )?;
        writeln!(
            writer,
            "CRYST1{:>9.3}{:>9.3}{:>9.3}{:>7.2}{:>7.2}{:>7.2} {:<11}{:>4}",
            1.0, 1.0, 1.0, 90.0, 90.0, 90.0, "P 1", 1
        )?;

        let mut previous_chain: Option<char> = None;
        for (i, atom) in structure.atoms().iter().enumerate() {
            if previous_chain.is_some_and(|chain| chain != atom.chain_id) {
                writeln!(writer, "TER")?;
            }
            previous_chain = Some(atom.chain_id);

            let record_type = if is_protein_residue(&atom.residue_name) {
                "ATOM"
            } else {
                "HETATM"
            };
            let name = if atom.name.len() < 4 && atom.element.len() < 2 {
                format!(" {:<3}", atom.name)
            } else {
                format!("{:<4}", atom.name)
            };
            writeln!(
                writer,
                "{:<6}{:>5} {:<4} {:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                record_type,
                (i + 1) % 100_000,
                name,
                atom.residue_name,
                atom.chain_id,
                atom.residue_number,
                atom.insertion_code.unwrap_or(' '),
                atom.position.x,
                atom.position.y,
                atom.position.z,
                1.0,
                0.0,
                atom.element,
            )?;
        }
        if previous_chain.is_some() {
            writeln!(writer, "TER")?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// A multi-model PDB file read one model at a time.
///
/// Each `MODEL`/`ENDMDL` block (or each block terminated by `END`) becomes
/// one [`Frame`]. A file without model records is a single frame. Every
/// frame must contain as many atoms as the first one.
pub struct PdbTrajectory<R> {
    reader: R,
    line_number: usize,
    atoms_per_frame: Option<usize>,
    finished: bool,
}

impl PdbTrajectory<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> PdbTrajectory<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            atoms_per_frame: None,
            finished: false,
        }
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, PdbError> {
        let mut positions = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            self.line_number += 1;
            if is_atom_record(&line) {
                if is_primary_conformer(&line) {
                    positions.push(parse_position(&line, self.line_number)?);
                }
            } else if matches!(record_name(&line), "ENDMDL" | "END") && !positions.is_empty() {
                break;
            }
        }

        if positions.is_empty() {
            return Ok(None);
        }
        match self.atoms_per_frame {
            Some(expected) if expected != positions.len() => {
                return Err(PdbError::Inconsistency(format!(
                    "Model ending on line {} has {} atoms, expected {}",
                    self.line_number,
                    positions.len(),
                    expected
                )));
            }
            Some(_) => {}
            None => self.atoms_per_frame = Some(positions.len()),
        }
        Ok(Some(Frame::new(positions)))
    }
}

impl<R: BufRead> Iterator for PdbTrajectory<R> {
    type Item = Result<Frame, PdbError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
