//! # Core Module
//!
//! Stateless building blocks shared by every graph builder.
//!
//! ## Architecture
//!
//! - **Records and identities** ([`models`]) - Atom records as read from coordinate
//!   files and the `chain:residue:number[:atom]` identities that key graph nodes
//! - **Residue knowledge** ([`residues`]) - Embedding tables and maximum solvent
//!   accessibilities
//! - **File I/O** ([`io`]) - Readers for PDB, contact reports, DSSP and custom edge lists
//! - **Utilities** ([`utils`]) - Identifier classification and geometry helpers
//!
//! Nothing in this module performs graph construction; that lives in
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod residues;
pub mod utils;
