//! # ssmap Core Library
//!
//! Secondary structure maps of molecular dynamics trajectories, built from the
//! per-residue assignments of the external STRIDE or DSSP programs.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`SecondaryStructureRecord`,
//!   `Structure`, `SecondaryStructureMap`), the class taxonomy, the tool output parsers,
//!   file I/O and the content/composition statistics.
//!
//! - **[`engine`]: The Logic Core.** Runs the assignment tools as bounded subprocesses,
//!   validates residue consistency between frames and accumulates the map frame by frame.
//!
//! - **[`workflows`]: The Public API.** Entry points for a single structure and for a
//!   whole trajectory, used by the command-line front end.

pub mod core;
pub mod engine;
pub mod workflows;
