//! Data structures shared by every layer of the library.
//!
//! - [`record`] - Per-residue assignments parsed from STRIDE or DSSP output
//! - [`structure`] - Atoms, structure snapshots, trajectory frames and atom selections
//! - [`map`] - The residue-by-frame secondary structure map

pub mod map;
pub mod record;
pub mod structure;
