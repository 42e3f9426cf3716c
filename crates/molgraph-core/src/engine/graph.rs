use super::config::Granularity;
use super::edges::{EdgeAttribute, EdgeCandidate, EdgeEndpoint, EdgeKind};
use super::error::GraphError;
use super::features::{AlignedFeatures, SS_DIMENSION};
use crate::core::models::identity::NodeId;
use crate::core::models::record::AtomRecord;
use crate::core::residues::embedding::{EmbeddingScheme, embed};
use std::collections::HashMap;
use tracing::debug;

/// A graph node: one residue or one atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub residue_name: String,
    pub chain_id: char,
    pub residue_number: isize,
    pub atom_name: Option<String>,
    /// Residue embedding, width fixed by the graph's scheme.
    pub h: Vec<f64>,
    pub coords: [f64; 3],
    pub ss: Option<[f64; SS_DIMENSION]>,
    pub asa: Option<f64>,
    pub rsa: Option<f64>,
}

/// A directed, attributed edge between two node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub attribute: EdgeAttribute,
}

impl Edge {
    pub fn kind(&self) -> EdgeKind {
        self.attribute.kind()
    }
}

/// A protein structure graph.
///
/// Nodes are inserted once, in record order, and keep their index for the lifetime of
/// the graph. Edges form a multiset: parallel edges of different kinds between the same
/// pair of nodes are kept.
#[derive(Debug, Clone)]
pub struct ProteinGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
    scheme: EmbeddingScheme,
}

impl ProteinGraph {
    /// Creates the node set from cleaned records.
    ///
    /// Records that map to an identity already present (for example the remaining atoms
    /// of a multi-atom ligand in a residue-level graph) are skipped; the first record wins.
    ///
    /// # Arguments
    ///
    /// * `records` - Cleaned records in node order.
    /// * `granularity` - Decides whether identities carry the atom name.
    /// * `scheme` - The embedding used for node features.
    pub fn from_records(records: &[AtomRecord], granularity: &Granularity, scheme: EmbeddingScheme) -> Self {
        let atom_level = granularity.is_atom_level();
        let mut nodes = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());
        let mut duplicates = 0usize;

        for record in records {
            let id = NodeId::from_record(record, atom_level);
            if index.contains_key(&id) {
                duplicates += 1;
                continue;
            }
            index.insert(id.clone(), nodes.len());
            nodes.push(Node {
                id,
                residue_name: record.residue_name.clone(),
                chain_id: record.chain_id,
                residue_number: record.residue_number,
                atom_name: atom_level.then(|| record.atom_name.clone()),
                h: embed(&record.residue_name, scheme),
                coords: [record.position.x, record.position.y, record.position.z],
                ss: None,
                asa: None,
                rsa: None,
            });
        }

        if duplicates > 0 {
            debug!("Skipped {} records with duplicate node identities.", duplicates);
        }

        Self {
            nodes,
            edges: Vec::new(),
            index,
            scheme,
        }
    }

    fn resolve(&self, endpoint: &EdgeEndpoint) -> Option<usize> {
        match endpoint {
            EdgeEndpoint::Index(i) => (*i < self.nodes.len()).then_some(*i),
            EdgeEndpoint::Id(id) => self.index.get(id).copied(),
        }
    }

    /// Resolves and inserts a batch of candidate edges.
    ///
    /// # Return
    ///
    /// The number of edges inserted. Candidates naming nodes outside the graph are dropped.
    pub fn add_edges(&mut self, candidates: impl IntoIterator<Item = EdgeCandidate>) -> usize {
        let mut inserted = 0usize;
        let mut dropped = 0usize;
        for candidate in candidates {
            match (self.resolve(&candidate.source), self.resolve(&candidate.target)) {
                (Some(source), Some(target)) => {
                    self.edges.push(Edge {
                        source,
                        target,
                        attribute: candidate.attribute,
                    });
                    inserted += 1;
                }
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            debug!("Dropped {} edges referencing nodes outside the graph.", dropped);
        }
        inserted
    }

    /// Sets secondary-structure features, one row per node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Internal`] if the row count differs from the node count.
    pub fn attach_features(&mut self, features: AlignedFeatures) -> Result<(), GraphError> {
        if features.len() != self.nodes.len() {
            return Err(GraphError::Internal(format!(
                "{} feature rows for {} nodes",
                features.len(),
                self.nodes.len()
            )));
        }
        let rows = features
            .ss
            .into_iter()
            .zip(features.asa)
            .zip(features.rsa);
        for (node, ((ss, asa), rsa)) in self.nodes.iter_mut().zip(rows) {
            node.ss = Some(ss);
            node.asa = Some(asa);
            node.rsa = Some(rsa);
        }
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind() == kind)
    }

    pub fn embedding_scheme(&self) -> EmbeddingScheme {
        self.scheme
    }

    pub fn has_secondary_structure(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|n| n.ss.is_some())
    }

    /// Replaces string labels with integer codes.
    pub fn encode_labels(self) -> EncodedGraph {
        let residue_name_encoder = LabelEncoder::fit(self.nodes.iter().map(|n| n.residue_name.as_str()));
        let id_encoder = LabelEncoder::fit(self.nodes.iter().map(|n| n.id.to_string()));

        let residue_name_codes = self
            .nodes
            .iter()
            .filter_map(|n| residue_name_encoder.encode(&n.residue_name))
            .collect();
        let id_codes = self
            .nodes
            .iter()
            .filter_map(|n| id_encoder.encode(&n.id.to_string()))
            .collect();

        EncodedGraph {
            graph: self,
            residue_name_codes,
            id_codes,
            residue_name_encoder,
            id_encoder,
        }
    }
}

/// Maps string labels to dense integer codes in sorted label order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(|s| s.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// A graph whose string labels were encoded, with the encoders needed to invert them.
#[derive(Debug, Clone)]
pub struct EncodedGraph {
    pub graph: ProteinGraph,
    pub residue_name_codes: Vec<usize>,
    pub id_codes: Vec<usize>,
    pub residue_name_encoder: LabelEncoder,
    pub id_encoder: LabelEncoder,
}
