//! # Workflows Module
//!
//! Top-level entry points of the library. Each workflow validates its input,
//! builds the engine pieces it needs and reports progress while it runs.
//!
//! - **Single Structure** ([`single`]) - One snapshot through STRIDE or DSSP into records
//! - **Trajectory** ([`trajectory`]) - A whole trajectory into a map, or into a content series
//!   without building the map

pub mod single;
pub mod trajectory;
