use crate::core::taxonomy::{SsClass, UnknownCodeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Frame has {found} residues but the map has {expected} rows")]
    ColumnLength { expected: usize, found: usize },
    #[error("Row {row} has {found} frames, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid class id at residue {row}, frame {frame}: {source}")]
    InvalidId {
        row: usize,
        frame: usize,
        source: UnknownCodeError,
    },
}

/// Error returned when a frame index lies outside a map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Frame index {frame} is out of range for a map with {n_frames} frames")]
pub struct IndexError {
    pub frame: usize,
    pub n_frames: usize,
}

/// Residue-by-frame matrix of secondary structure classes.
///
/// Rows are residues in the order the assignment tool emitted them; columns
/// are 0-based frame indices. Cells are stored column-major since maps grow
/// one frame at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecondaryStructureMap {
    n_residues: usize,
    n_frames: usize,
    cells: Vec<SsClass>,
}

impl SecondaryStructureMap {
    /// Creates a map with `n_residues` rows and no frames.
    pub fn with_residues(n_residues: usize) -> Self {
        Self {
            n_residues,
            n_frames: 0,
            cells: Vec::new(),
        }
    }

    /// Appends the classes of one frame as a new column.
    pub fn push_frame(&mut self, column: &[SsClass]) -> Result<(), MapError> {
        if column.len() != self.n_residues {
            return Err(MapError::ColumnLength {
                expected: self.n_residues,
                found: column.len(),
            });
        }
        self.cells.extend_from_slice(column);
        self.n_frames += 1;
        Ok(())
    }

    /// Builds a map from rows of numeric class ids, one row per residue.
    pub fn from_id_rows(rows: &[Vec<u8>]) -> Result<Self, MapError> {
        let n_residues = rows.len();
        let n_frames = rows.first().map_or(0, Vec::len);
        for (row, ids) in rows.iter().enumerate() {
            if ids.len() != n_frames {
                return Err(MapError::RaggedRow {
                    row,
                    expected: n_frames,
                    found: ids.len(),
                });
            }
        }

        let mut cells = Vec::with_capacity(n_residues * n_frames);
        for frame in 0..n_frames {
            for (row, ids) in rows.iter().enumerate() {
                let class = SsClass::from_id(ids[frame])
                    .map_err(|source| MapError::InvalidId { row, frame, source })?;
                cells.push(class);
            }
        }
        Ok(Self {
            n_residues,
            n_frames,
            cells,
        })
    }

    pub fn n_residues(&self) -> usize {
        self.n_residues
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn is_empty(&self) -> bool {
        self.n_frames == 0
    }

    pub fn get(&self, residue: usize, frame: usize) -> Option<SsClass> {
        if residue >= self.n_residues || frame >= self.n_frames {
            return None;
        }
        Some(self.cells[frame * self.n_residues + residue])
    }

    /// Numeric id of a cell, as persisted in map files.
    pub fn id(&self, residue: usize, frame: usize) -> Option<u8> {
        self.get(residue, frame).map(SsClass::id)
    }

    /// Classes of all residues at `frame`.
    pub fn frame(&self, frame: usize) -> Result<&[SsClass], IndexError> {
        if frame >= self.n_frames {
            return Err(IndexError {
                frame,
                n_frames: self.n_frames,
            });
        }
        let start = frame * self.n_residues;
        Ok(&self.cells[start..start + self.n_residues])
    }

    pub fn frames(&self) -> impl Iterator<Item = &[SsClass]> {
        let n = self.n_residues;
        (0..self.n_frames).map(move |frame| &self.cells[frame * n..(frame + 1) * n])
    }

    /// Classes of one residue across all frames.
    pub fn residue(&self, residue: usize) -> impl Iterator<Item = SsClass> + '_ {
        let valid = residue < self.n_residues;
        (0..self.n_frames)
            .filter(move |_| valid)
            .map(move |frame| self.cells[frame * self.n_residues + residue])
    }

    /// Rows of numeric ids, one per residue.
    pub fn to_id_rows(&self) -> Vec<Vec<u8>> {
        (0..self.n_residues)
            .map(|residue| self.residue(residue).map(SsClass::id).collect())
            .collect()
    }
}
