//! Residue-level lookup tables.
//!
//! All tables are compile-time `phf` maps; lookups never allocate and never fail, a
//! miss is reported through `Option` or a zero vector.

pub mod accessibility;
pub mod embedding;
