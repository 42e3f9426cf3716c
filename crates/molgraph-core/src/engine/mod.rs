//! # Engine Module
//!
//! Graph construction logic for protein structures.
//!
//! ## Overview
//!
//! The engine turns cleaned coordinate records into a [`graph::ProteinGraph`]: one node
//! per selected residue (or atom), embedding features per node, edges contributed by any
//! number of independent strategies, and optional secondary-structure features joined
//! onto the nodes.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Granularity, embedding scheme, interaction whitelist,
//!   thresholds and artifact locations
//! - **Preprocessing** ([`preprocess`]) - Record filtering and granularity reduction
//! - **Edge Strategies** ([`edges`]) - Contact, distance, k-nearest-neighbour, Delaunay,
//!   custom and dense edge construction behind one trait
//! - **Feature Alignment** ([`features`]) - DSSP descriptors joined onto nodes
//! - **Assembly and Export** ([`graph`], [`export`]) - The graph container, label
//!   encoding and conversions to serialisable, tensor and `petgraph` forms
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error type
//!
//! Strategies are composed by the caller, never selected by name inside the engine;
//! string dispatch exists only at the configuration boundary ([`config::StrategyKind`]).

pub mod config;
pub mod edges;
pub mod error;
pub mod export;
pub mod features;
pub mod graph;
pub mod preprocess;
pub mod progress;
