use super::config::{ChainSelection, Granularity, PreprocessConfig};
use super::error::GraphError;
use crate::core::models::identity::NodeId;
use crate::core::models::record::{AtomRecord, AtomTable, ResidueKey};
use crate::core::utils::geometry::centroid;
use crate::core::utils::identifiers::{is_heavy_atom, is_water_residue};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Reduces a raw atom table to the ordered records that become graph nodes.
///
/// Records are grouped by the selected chains (in selection order). Within a chain the
/// granularity-reduced `ATOM` records come first, followed by that chain's hetero
/// records when `keep_heteroatoms` is set. Only the primary conformer (blank or `A`
/// alternate location) of every atom is kept.
///
/// # Arguments
///
/// * `table` - The raw records of one structure.
/// * `config` - Granularity and record filters.
/// * `chains` - The chains that contribute nodes.
///
/// # Errors
///
/// Returns [`GraphError::EmptyStructure`] if no record survives the filters.
pub fn preprocess(
    table: &AtomTable,
    config: &PreprocessConfig,
    chains: &ChainSelection,
) -> Result<Vec<AtomRecord>, GraphError> {
    let selected = chains.resolve(&table.chains());
    let mut cleaned = Vec::new();
    let mut hetero_count = 0usize;

    for chain_id in selected {
        let chain_atoms: Vec<&AtomRecord> = table
            .atoms
            .iter()
            .filter(|r| r.chain_id == chain_id && r.is_primary_conformer())
            .collect();
        if chain_atoms.is_empty() {
            debug!(chain = %chain_id, "Selected chain has no ATOM records.");
        }

        match &config.granularity {
            Granularity::Atom => cleaned.extend(
                chain_atoms
                    .iter()
                    .filter(|r| !config.deprotonate || is_heavy_atom(&r.atom_name))
                    .map(|r| (*r).clone()),
            ),
            Granularity::Representative(name) => cleaned.extend(
                chain_atoms
                    .iter()
                    .filter(|r| r.atom_name == *name)
                    .map(|r| (*r).clone()),
            ),
            Granularity::Centroid => {
                cleaned.extend(centroid_records(&chain_atoms, config.deprotonate))
            }
        }

        if config.keep_heteroatoms {
            let hetero = table.hetatms.iter().filter(|r| {
                r.chain_id == chain_id
                    && r.is_primary_conformer()
                    && !(config.exclude_waters && is_water_residue(&r.residue_name))
            });
            let before = cleaned.len();
            cleaned.extend(hetero.cloned());
            hetero_count += cleaned.len() - before;
        }
    }

    if config.keep_heteroatoms {
        debug!("Detected {} HETATM nodes.", hetero_count);
    }
    info!(
        "Detected {} total nodes at {} granularity.",
        cleaned.len(),
        config.granularity
    );

    if cleaned.is_empty() {
        return Err(GraphError::EmptyStructure);
    }
    Ok(cleaned)
}

/// Replaces the coordinates of each residue's `CA` record with the mean position of
/// the residue's atoms. Residues without a `CA` record are dropped.
fn centroid_records(chain_atoms: &[&AtomRecord], deprotonate: bool) -> Vec<AtomRecord> {
    let mut members: HashMap<ResidueKey, Vec<&Point3<f64>>> = HashMap::new();
    for record in chain_atoms {
        if deprotonate && !is_heavy_atom(&record.atom_name) {
            continue;
        }
        members
            .entry(record.residue_key())
            .or_default()
            .push(&record.position);
    }

    let mut result = Vec::new();
    let mut with_ca = 0usize;
    for record in chain_atoms.iter().filter(|r| r.atom_name == "CA") {
        with_ca += 1;
        let Some(center) = members
            .get(&record.residue_key())
            .and_then(|points| centroid(points.iter().copied()))
        else {
            continue;
        };
        let mut reduced = (*record).clone();
        reduced.position = center;
        result.push(reduced);
    }

    if members.len() > with_ca {
        debug!(
            "Dropped {} residues without a CA atom while computing centroids.",
            members.len() - with_ca
        );
    }
    result
}

/// Keeps the first record of every node identity.
///
/// A multi-atom ligand collapses to a single residue-level node; atom-level identities
/// are already distinct unless the file repeats an atom.
pub fn distinct_nodes(records: Vec<AtomRecord>, atom_level: bool) -> Vec<AtomRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();
    let distinct: Vec<AtomRecord> = records
        .into_iter()
        .filter(|r| seen.insert(NodeId::from_record(r, atom_level)))
        .collect();
    if distinct.len() < before {
        debug!(
            "Merged {} records into nodes that share an identity.",
            before - distinct.len()
        );
    }
    distinct
}
