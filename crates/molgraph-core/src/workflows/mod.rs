//! # Workflows Module
//!
//! High-level entry points that build complete graphs from raw inputs.
//!
//! ## Overview
//!
//! Each workflow owns the graph it builds from the first phase to the last and hands the
//! finished value back to the caller. Workflows validate requests before touching the
//! filesystem, report progress through the engine's [`ProgressReporter`], and log every
//! phase with `tracing`.
//!
//! ## Architecture
//!
//! - **Protein Workflow** ([`protein`]) - Structure preprocessing, node seeding, edge
//!   strategies, secondary-structure features and label encoding
//! - **External Artifacts** ([`external`]) - Cache-first resolution of contact reports
//!   and DSSP output, falling back to blocking tool runs
//! - **RNA Workflow** ([`rna`]) - Backbone and base-pair graphs from dot-bracket strings
//! - **PPI Workflow** ([`ppi`]) - Interaction networks aggregated from remote sources
//!   behind the [`ppi::InteractionClient`] trait
//!
//! [`ProgressReporter`]: crate::engine::progress::ProgressReporter

pub mod external;
pub mod ppi;
pub mod protein;
pub mod rna;
