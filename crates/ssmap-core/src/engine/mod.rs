//! # Engine Module
//!
//! Runs the external assignment tools and turns a trajectory into a
//! secondary structure map, one frame at a time.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tool executables, extra arguments and the invocation timeout
//! - **Subprocesses** ([`process`]) - Bounded execution of a tool with captured output
//! - **Assignment** ([`assigner`]) - The [`assigner::SecondaryStructureAssigner`] seam and its STRIDE/DSSP implementation
//! - **Frame Loop** ([`frames`]) - Sequential per-frame assignment with residue consistency checks
//! - **Accumulation** ([`builder`]) - Map building and streamed content series
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod assigner;
pub mod builder;
pub mod config;
pub mod error;
pub mod frames;
pub mod process;
pub mod progress;
