//! Reading and writing of the files exchanged with assignment tools and users.
//!
//! Structures and trajectories are read from PDB files, snapshots handed to
//! STRIDE and DSSP are written as PDB, and maps and record tables are
//! persisted as delimited text.

pub mod pdb;
pub mod table;
pub mod traits;
