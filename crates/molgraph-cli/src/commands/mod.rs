pub mod ppi;
pub mod protein;
pub mod rna;
