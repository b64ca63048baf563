//! # Core Module
//!
//! Stateless building blocks: the secondary structure class table, the data
//! models, the parsers for assignment tool output, file I/O and the
//! statistics computed over maps.
//!
//! ## Overview
//!
//! - **Classification** ([`taxonomy`]) - Codes, numeric ids and names of the ten classes, plus predicates
//! - **Data Models** ([`models`]) - Records, structures, trajectory frames and the residue-by-frame map
//! - **Tool Output** ([`parsers`]) - STRIDE and DSSP text output into records
//! - **File I/O** ([`io`]) - PDB structures and trajectories, map and record tables
//! - **Statistics** ([`analysis`]) - Class content over time and per residue, class composition

pub mod analysis;
pub mod io;
pub mod models;
pub mod parsers;
pub mod taxonomy;
