//! # molgraph Core Library
//!
//! Graph construction for biomolecular structures. Protein coordinate files become
//! residue- or atom-level graphs with learned-embedding node features, RNA dot-bracket
//! strings become backbone/base-pair graphs, and protein-protein interaction records
//! become undirected interaction networks.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomRecord`, `NodeId`),
//!   immutable residue tables (Meiler/Kidera embeddings, maximum accessibilities) and
//!   readers for the file formats the graph builders consume (PDB coordinates, contact
//!   reports, DSSP output, custom edge lists).
//!
//! - **[`engine`]: The Logic Core.** Configuration, structure preprocessing, the
//!   pluggable edge strategies (contacts, distance, k-nearest neighbours, Delaunay,
//!   custom, dense), secondary-structure feature alignment and the graph assembler with
//!   its export adapters.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the lower layers:
//!   protein graph construction, RNA graph construction, PPI network construction and
//!   the resolution of artifacts produced by external tools.

pub mod core;
pub mod engine;
pub mod workflows;
