//! Readers for the file formats consumed by the graph builders.
//!
//! - [`pdb`] - Fixed-column PDB coordinate records (`ATOM`/`HETATM`)
//! - [`contacts`] - Tab-separated static contact reports
//! - [`dssp`] - Classic DSSP secondary-structure output
//! - [`edges`] - User-supplied edge lists in CSV form

pub mod contacts;
pub mod dssp;
pub mod edges;
pub mod pdb;
pub mod traits;
