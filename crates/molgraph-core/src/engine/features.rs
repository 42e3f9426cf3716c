use super::config::{AlignmentPolicy, ChainSelection};
use crate::core::io::dssp::DsspRecord;
use crate::core::models::identity::NodeId;
use crate::core::residues::accessibility::relative_accessibility;
use crate::core::utils::identifiers::three_to_one;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Secondary-structure classes in one-hot order.
pub const SS_CATEGORIES: [char; 9] = ['G', 'H', 'I', 'E', 'B', 'T', 'S', 'C', '-'];

pub const SS_DIMENSION: usize = SS_CATEGORIES.len();

/// One-hot encoding of a secondary-structure code; unknown codes encode as all zeros.
pub fn ss_one_hot(code: char) -> [f64; SS_DIMENSION] {
    let mut v = [0.0; SS_DIMENSION];
    if let Some(i) = SS_CATEGORIES.iter().position(|&c| c == code) {
        v[i] = 1.0;
    }
    v
}

/// Per-residue descriptors derived from DSSP output.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueDescriptor {
    pub chain_id: char,
    pub residue_number: isize,
    /// One-letter amino acid code.
    pub residue_name: char,
    pub ss: char,
    pub asa: f64,
    pub rsa: f64,
}

/// Converts DSSP rows into descriptors for the selected chains.
///
/// Rows with insertion codes are dropped, lower-case (half-cystine) codes become `C`,
/// and residues without a maximum-accessibility reference are skipped.
pub fn descriptors_from_dssp(records: &[DsspRecord], chains: &ChainSelection) -> Vec<ResidueDescriptor> {
    let mut skipped = 0usize;
    let descriptors: Vec<ResidueDescriptor> = records
        .iter()
        .filter(|r| r.insertion_code.is_none() && chains.contains(r.chain_id))
        .filter_map(|r| {
            let residue_name = if r.amino_acid.is_ascii_lowercase() {
                'C'
            } else {
                r.amino_acid
            };
            let Some(rsa) = relative_accessibility(residue_name, r.accessibility) else {
                skipped += 1;
                return None;
            };
            Some(ResidueDescriptor {
                chain_id: r.chain_id,
                residue_number: r.residue_number,
                residue_name,
                ss: r.secondary_structure,
                asa: r.accessibility,
                rsa,
            })
        })
        .collect();
    if skipped > 0 {
        debug!("Skipped {} DSSP residues with non-standard amino acids.", skipped);
    }
    descriptors
}

/// Node-aligned secondary-structure features, one row per node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedFeatures {
    pub ss: Vec<[f64; SS_DIMENSION]>,
    pub asa: Vec<f64>,
    pub rsa: Vec<f64>,
}

impl AlignedFeatures {
    fn with_capacity(n: usize) -> Self {
        Self {
            ss: Vec::with_capacity(n),
            asa: Vec::with_capacity(n),
            rsa: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, descriptor: Option<&ResidueDescriptor>) {
        match descriptor {
            Some(d) => {
                self.ss.push(ss_one_hot(d.ss));
                self.asa.push(d.asa);
                self.rsa.push(d.rsa);
            }
            None => {
                self.ss.push([0.0; SS_DIMENSION]);
                self.asa.push(0.0);
                self.rsa.push(0.0);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ss.is_empty()
    }
}

/// Matches descriptors to nodes.
///
/// With [`AlignmentPolicy::Positional`] descriptor `i` goes to node `i`, and nodes past
/// the end of the descriptor list get zero rows. With [`AlignmentPolicy::ByIdentity`]
/// each node is matched on chain and residue number, provided the amino acid agrees;
/// unmatched nodes get zero rows.
pub fn align(ids: &[NodeId], descriptors: &[ResidueDescriptor], policy: AlignmentPolicy) -> AlignedFeatures {
    let mut features = AlignedFeatures::with_capacity(ids.len());

    match policy {
        AlignmentPolicy::Positional => {
            if descriptors.len() > ids.len() {
                warn!(
                    "{} descriptors for {} nodes; surplus rows are ignored.",
                    descriptors.len(),
                    ids.len()
                );
            }
            for i in 0..ids.len() {
                features.push(descriptors.get(i));
            }
        }
        AlignmentPolicy::ByIdentity => {
            let by_residue: HashMap<(char, isize), &ResidueDescriptor> = descriptors
                .iter()
                .map(|d| ((d.chain_id, d.residue_number), d))
                .collect();
            let mut unmatched = 0usize;
            for id in ids {
                let found = by_residue
                    .get(&(id.chain_id, id.residue_number))
                    .copied()
                    .filter(|d| three_to_one(&id.residue_name) == Some(d.residue_name));
                if found.is_none() {
                    unmatched += 1;
                }
                features.push(found);
            }
            if unmatched > 0 {
                debug!("{} nodes have no secondary-structure descriptor.", unmatched);
            }
        }
    }

    features
}
