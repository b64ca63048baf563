use nalgebra::Point3;
use phf::{Set, phf_set};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static PROTEIN_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    // Common protonation and naming variants written by MD packages.
    "HSD", "HSE", "HSP", "HID", "HIE", "HIP", "CYX", "CYM", "ASH", "GLH",
    "LYN", "MSE",
};

pub fn is_protein_residue(residue_name: &str) -> bool {
    PROTEIN_RESIDUE_NAMES.contains(residue_name.trim())
}

/// An atom of a structure snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Position of this atom in the full, unselected structure. Trajectory
    /// frames are indexed with it.
    pub index: usize,
    pub serial: usize,
    pub name: String,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    pub element: String,
    pub position: Point3<f64>,
}

/// Identity of a residue within a structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueKey {
    pub chain_id: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
}

impl Atom {
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            chain_id: self.chain_id,
            residue_number: self.residue_number,
            insertion_code: self.insertion_code,
        }
    }
}

/// Coordinates of every atom of a trajectory at one point in time, in the
/// atom order fixed when the trajectory was opened.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub positions: Vec<Point3<f64>>,
}

impl Frame {
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self { positions }
    }

    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Atom index {atom_index} is out of range for a frame of {frame_atoms} atoms")]
pub struct FrameMismatchError {
    pub atom_index: usize,
    pub frame_atoms: usize,
}

/// Subset of atoms handed to the assignment tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomSelection {
    All,
    /// Atoms of standard protein residues.
    #[default]
    Protein,
    Chain(char),
    ProteinChain(char),
}

impl AtomSelection {
    pub fn matches(&self, atom: &Atom) -> bool {
        match self {
            AtomSelection::All => true,
            AtomSelection::Protein => is_protein_residue(&atom.residue_name),
            AtomSelection::Chain(id) => atom.chain_id == *id,
            AtomSelection::ProteinChain(id) => {
                atom.chain_id == *id && is_protein_residue(&atom.residue_name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid atom selection '{0}'. Expected 'all', 'protein', 'chain X' or 'protein and chain X'."
)]
pub struct ParseSelectionError(pub String);

impl FromStr for AtomSelection {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSelectionError(s.to_string());
        let parse_chain = |tokens: &[&str]| -> Result<char, ParseSelectionError> {
            match tokens {
                ["chain", id] => {
                    let mut chars = id.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(c),
                        _ => Err(err()),
                    }
                }
                _ => Err(err()),
            }
        };

        let lowered = s.trim().to_ascii_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        // Chain ids are case sensitive, so they are taken from the original input.
        let original: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            ["all"] => Ok(AtomSelection::All),
            ["protein"] => Ok(AtomSelection::Protein),
            ["chain", _] => parse_chain(&["chain", original[1]]).map(AtomSelection::Chain),
            ["protein", "and", "chain", _] => {
                parse_chain(&["chain", original[3]]).map(AtomSelection::ProteinChain)
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for AtomSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomSelection::All => write!(f, "all"),
            AtomSelection::Protein => write!(f, "protein"),
            AtomSelection::Chain(id) => write!(f, "chain {}", id),
            AtomSelection::ProteinChain(id) => write!(f, "protein and chain {}", id),
        }
    }
}

/// An ordered set of atoms: a whole structure or a selected subset of one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    atoms: Vec<Atom>,
}

impl Structure {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Returns the atoms matching `selection`, keeping their original indices.
    pub fn select(&self, selection: &AtomSelection) -> Structure {
        Structure {
            atoms: self
                .atoms
                .iter()
                .filter(|atom| selection.matches(atom))
                .cloned()
                .collect(),
        }
    }

    /// Number of residues, counted as runs of atoms sharing a residue key.
    pub fn residue_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<ResidueKey> = None;
        for atom in &self.atoms {
            let key = atom.residue_key();
            if previous.as_ref() != Some(&key) {
                count += 1;
                previous = Some(key);
            }
        }
        count
    }

    /// Copies the coordinates of this structure's atoms out of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameMismatchError`] if an atom index is outside the frame,
    /// in which case no coordinate is modified.
    pub fn update_positions(&mut self, frame: &Frame) -> Result<(), FrameMismatchError> {
        if let Some(atom) = self.atoms.iter().find(|a| a.index >= frame.atom_count()) {
            return Err(FrameMismatchError {
                atom_index: atom.index,
                frame_atoms: frame.atom_count(),
            });
        }
        for atom in &mut self.atoms {
            atom.position = frame.positions[atom.index];
        }
        Ok(())
    }
}
