use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeStrategy, passes_separation};
use crate::core::io::contacts::ContactReport;
use crate::core::models::identity::NodeId;
use crate::engine::config::{ChainSelection, InteractionWhitelist};
use crate::engine::error::GraphError;
use std::collections::BTreeSet;
use tracing::debug;

/// Edges from a static contact report, one-hot encoded over the interaction whitelist.
pub struct ContactEdges {
    report: ContactReport,
    allowed: InteractionWhitelist,
    chains: ChainSelection,
}

impl ContactEdges {
    pub fn new(report: ContactReport, allowed: InteractionWhitelist, chains: ChainSelection) -> Self {
        Self {
            report,
            allowed,
            chains,
        }
    }
}

/// The `chain:residue:number` prefix of an atom descriptor.
fn residue_descriptor(atom: &str) -> Option<String> {
    let mut fields = atom.splitn(4, ':');
    let chain = fields.next()?;
    let residue = fields.next()?;
    let number = fields.next()?;
    fields.next()?;
    Some(format!("{}:{}:{}", chain, residue, number))
}

/// Unassigned residues (`X:`), residue number zero and trailing insertion codes.
fn is_malformed(residue: &str) -> bool {
    residue.ends_with(|c: char| c.is_ascii_uppercase())
        || residue.ends_with(":0")
        || residue.starts_with("X:")
}

fn chain_of(descriptor: &str) -> Option<char> {
    let mut chars = descriptor.split(':').next()?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl EdgeStrategy for ContactEdges {
    fn name(&self) -> &'static str {
        "contacts"
    }

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        let atom_level = ctx.granularity.is_atom_level();

        let mut unique: BTreeSet<(String, String, String)> = BTreeSet::new();
        for row in self.report.rows() {
            let endpoints = if atom_level {
                Some((row.atom1.clone(), row.atom2.clone()))
            } else {
                residue_descriptor(&row.atom1).zip(residue_descriptor(&row.atom2))
            };
            match endpoints {
                Some((a, b)) => {
                    unique.insert((a, b, row.interaction_type.clone()));
                }
                None => debug!(
                    "Skipping contact with unparsable descriptors: {} / {}",
                    row.atom1, row.atom2
                ),
            }
        }

        let mut candidates = Vec::new();
        let mut dropped = 0usize;
        for (a, b, kind) in unique {
            let Some(one_hot) = self.allowed.one_hot(&kind) else {
                dropped += 1;
                continue;
            };
            let in_chains = [&a, &b]
                .iter()
                .all(|d| chain_of(d).is_some_and(|c| self.chains.contains(c)));
            let (residue_a, residue_b) = if atom_level {
                (
                    residue_descriptor(&a).unwrap_or_else(|| a.clone()),
                    residue_descriptor(&b).unwrap_or_else(|| b.clone()),
                )
            } else {
                (a.clone(), b.clone())
            };
            if !in_chains || is_malformed(&residue_a) || is_malformed(&residue_b) {
                dropped += 1;
                continue;
            }

            let (Ok(id_a), Ok(id_b)) = (a.parse::<NodeId>(), b.parse::<NodeId>()) else {
                dropped += 1;
                continue;
            };
            if !passes_separation(
                id_a.residue_number,
                id_b.residue_number,
                ctx.sequence_separation,
            ) {
                dropped += 1;
                continue;
            }

            candidates.push(EdgeCandidate::new(
                id_a,
                id_b,
                EdgeAttribute::Interaction(one_hot),
            ));
        }

        debug!(
            "Contact strategy kept {} edges, filtered {}.",
            candidates.len(),
            dropped
        );
        Ok(candidates)
    }
}
