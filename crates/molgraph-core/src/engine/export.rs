//! Conversions of a finished [`ProteinGraph`] into forms consumed outside the engine.
//!
//! - [`AttributedGraph`]: a serde-serialisable node/edge listing with named attributes.
//! - [`TensorGraph`]: dense node and edge matrices plus an edge index, the layout
//!   graph-learning frameworks expect.
//! - [`ProteinGraph::to_petgraph`]: a `petgraph` graph for traversal and analysis.
//! - [`GraphSummary`]: counts for logs and terminal output.

use super::edges::{EdgeAttribute, EdgeKind};
use super::features::SS_DIMENSION;
use super::graph::{EncodedGraph, Node, ProteinGraph};
use crate::core::models::identity::NodeId;
use petgraph::graph::DiGraph;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributedNode {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residue_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_code: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residue_name_code: Option<usize>,
    pub chain_id: char,
    pub residue_number: isize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom_name: Option<String>,
    pub h: Vec<f64>,
    pub coords: [f64; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ss: Option<[f64; SS_DIMENSION]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsa: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributedEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    /// Attribute values keyed by their export name (`rel_type`, `dist`, ...).
    pub attributes: BTreeMap<&'static str, Vec<f64>>,
}

/// A directed graph with named node and edge attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributedGraph {
    pub directed: bool,
    pub embedding: String,
    pub nodes: Vec<AttributedNode>,
    pub edges: Vec<AttributedEdge>,
}

impl AttributedGraph {
    /// Builds the listing; with `remove_string_labels` the `id` and `residue_name`
    /// strings are left out.
    pub fn from_graph(graph: &ProteinGraph, remove_string_labels: bool) -> Self {
        Self::build(graph, None, remove_string_labels)
    }

    /// Like [`AttributedGraph::from_graph`], with the integer label codes included.
    pub fn from_encoded(encoded: &EncodedGraph, remove_string_labels: bool) -> Self {
        Self::build(&encoded.graph, Some(encoded), remove_string_labels)
    }

    fn build(graph: &ProteinGraph, codes: Option<&EncodedGraph>, remove_string_labels: bool) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| AttributedNode {
                index,
                id: (!remove_string_labels).then(|| node.id.to_string()),
                residue_name: (!remove_string_labels).then(|| node.residue_name.clone()),
                id_code: codes.and_then(|c| c.id_codes.get(index).copied()),
                residue_name_code: codes.and_then(|c| c.residue_name_codes.get(index).copied()),
                chain_id: node.chain_id,
                residue_number: node.residue_number,
                atom_name: node.atom_name.clone(),
                h: node.h.clone(),
                coords: node.coords,
                ss: node.ss,
                asa: node.asa,
                rsa: node.rsa,
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let kind = edge.kind();
                AttributedEdge {
                    source: edge.source,
                    target: edge.target,
                    kind,
                    attributes: BTreeMap::from([(kind.export_name(), edge.attribute.values())]),
                }
            })
            .collect();

        Self {
            directed: true,
            embedding: graph.embedding_scheme().to_string(),
            nodes,
            edges,
        }
    }
}

/// Column range of one edge kind inside an `edge_attr` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttributeBlock {
    pub kind: EdgeKind,
    pub offset: usize,
    pub width: usize,
}

/// Dense matrices for graph-learning frameworks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorGraph {
    /// One row per node: label codes (encoded graphs only), `h`, coordinates and, when
    /// attached, the secondary-structure one-hot, ASA and RSA.
    pub x: Vec<Vec<f64>>,
    pub edge_index: Vec<[usize; 2]>,
    /// One row per edge; every row has the same width and carries zeros outside the
    /// block of its own kind.
    pub edge_attr: Vec<Vec<f64>>,
    pub edge_blocks: Vec<AttributeBlock>,
}

impl TensorGraph {
    pub fn from_graph(graph: &ProteinGraph) -> Self {
        Self::build(graph, None)
    }

    pub fn from_encoded(encoded: &EncodedGraph) -> Self {
        Self::build(&encoded.graph, Some(encoded))
    }

    fn build(graph: &ProteinGraph, codes: Option<&EncodedGraph>) -> Self {
        let with_ss = graph.has_secondary_structure();
        let x = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let mut row = Vec::new();
                if let Some(c) = codes {
                    row.push(c.id_codes.get(i).copied().unwrap_or_default() as f64);
                    row.push(c.residue_name_codes.get(i).copied().unwrap_or_default() as f64);
                }
                row.extend(node_row(node, with_ss));
                row
            })
            .collect();

        let edge_blocks = edge_blocks(graph);
        let width: usize = edge_blocks.iter().map(|b| b.width).sum();
        let mut edge_index = Vec::with_capacity(graph.edge_count());
        let mut edge_attr = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            edge_index.push([edge.source, edge.target]);
            let mut row = vec![0.0; width];
            if let Some(block) = edge_blocks.iter().find(|b| b.kind == edge.kind()) {
                for (slot, value) in row[block.offset..block.offset + block.width]
                    .iter_mut()
                    .zip(edge.attribute.values())
                {
                    *slot = value;
                }
            }
            edge_attr.push(row);
        }

        Self {
            x,
            edge_index,
            edge_attr,
            edge_blocks,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.x.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_index.len()
    }
}

fn node_row(node: &Node, with_ss: bool) -> Vec<f64> {
    let mut row = Vec::with_capacity(node.h.len() + 3 + SS_DIMENSION + 2);
    row.extend_from_slice(&node.h);
    row.extend_from_slice(&node.coords);
    if with_ss {
        row.extend_from_slice(&node.ss.unwrap_or([0.0; SS_DIMENSION]));
        row.push(node.asa.unwrap_or_default());
        row.push(node.rsa.unwrap_or_default());
    }
    row
}

/// Blocks for the edge kinds present in the graph, in [`EdgeKind::ALL`] order.
fn edge_blocks(graph: &ProteinGraph) -> Vec<AttributeBlock> {
    let mut widths: BTreeMap<EdgeKind, usize> = BTreeMap::new();
    for edge in graph.edges() {
        let width = widths.entry(edge.kind()).or_insert(0);
        *width = (*width).max(edge.attribute.values().len());
    }

    let mut offset = 0;
    EdgeKind::ALL
        .iter()
        .filter_map(|kind| {
            let width = *widths.get(kind)?;
            let block = AttributeBlock {
                kind: *kind,
                offset,
                width,
            };
            offset += width;
            Some(block)
        })
        .collect()
}

/// Edge and node counts of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub edges_by_kind: BTreeMap<EdgeKind, usize>,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes, {} edges", self.nodes, self.edges)?;
        if !self.edges_by_kind.is_empty() {
            let parts: Vec<String> = self
                .edges_by_kind
                .iter()
                .map(|(kind, count)| format!("{}: {}", kind, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

impl ProteinGraph {
    pub fn summary(&self) -> GraphSummary {
        let mut edges_by_kind = BTreeMap::new();
        for edge in self.edges() {
            *edges_by_kind.entry(edge.kind()).or_insert(0) += 1;
        }
        GraphSummary {
            nodes: self.node_count(),
            edges: self.edge_count(),
            edges_by_kind,
        }
    }

    /// Copies the graph into a `petgraph` directed graph. Node indices are preserved.
    pub fn to_petgraph(&self) -> DiGraph<NodeId, EdgeAttribute> {
        let mut g = DiGraph::with_capacity(self.node_count(), self.edge_count());
        let indices: Vec<_> = self.nodes().iter().map(|n| g.add_node(n.id.clone())).collect();
        for edge in self.edges() {
            g.add_edge(indices[edge.source], indices[edge.target], edge.attribute.clone());
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::record::AtomRecord;
    use crate::core::residues::embedding::EmbeddingScheme;
    use crate::engine::config::Granularity;
    use crate::engine::edges::EdgeCandidate;
    use crate::engine::features::AlignedFeatures;
    use nalgebra::Point3;
    use petgraph::visit::EdgeRef;

    fn graph() -> ProteinGraph {
        let records = vec![
            AtomRecord::new("CA", "GLY", 'A', 1, Point3::new(0.0, 0.0, 0.0)),
            AtomRecord::new("CA", "ALA", 'A', 2, Point3::new(3.8, 0.0, 0.0)),
            AtomRecord::new("CA", "LEU", 'A', 3, Point3::new(7.6, 0.0, 0.0)),
        ];
        let mut g = ProteinGraph::from_records(&records, &Granularity::default(), EmbeddingScheme::Meiler);
        g.add_edges(vec![
            EdgeCandidate::new(1, 0, EdgeAttribute::Distance(3.8)),
            EdgeCandidate::new(2, 0, EdgeAttribute::Interaction(vec![0.0, 1.0, 0.0])),
            EdgeCandidate::new(2, 1, EdgeAttribute::KnnConnectivity),
        ]);
        g
    }

    #[test]
    fn attributed_graph_names_edge_attributes() {
        let attributed = AttributedGraph::from_graph(&graph(), false);
        assert_eq!(attributed.nodes.len(), 3);
        assert_eq!(attributed.nodes[1].id.as_deref(), Some("A:ALA:2"));
        assert_eq!(attributed.edges[0].attributes["dist"], vec![3.8]);
        assert_eq!(attributed.edges[1].attributes["rel_type"], vec![0.0, 1.0, 0.0]);
        assert_eq!(attributed.edges[2].attributes["k_nn_dist"], vec![1.0]);
    }

    #[test]
    fn removing_string_labels_drops_them_from_json() {
        let attributed = AttributedGraph::from_encoded(&graph().encode_labels(), true);
        assert!(attributed.nodes.iter().all(|n| n.id.is_none() && n.residue_name.is_none()));
        assert_eq!(attributed.nodes[0].residue_name_code, Some(1));

        let json = serde_json::to_value(&attributed).unwrap();
        assert!(json["nodes"][0].get("id").is_none());
        assert_eq!(json["nodes"][0]["residue_name_code"], 1);
        assert_eq!(json["edges"][0]["kind"], "distance");
    }

    #[test]
    fn tensor_rows_have_uniform_width() {
        let tensors = TensorGraph::from_graph(&graph());
        assert_eq!(tensors.num_nodes(), 3);
        assert!(tensors.x.iter().all(|row| row.len() == 7 + 3));
        assert_eq!(tensors.edge_index, vec![[1, 0], [2, 0], [2, 1]]);

        assert_eq!(
            tensors.edge_blocks,
            vec![
                AttributeBlock { kind: EdgeKind::Interaction, offset: 0, width: 3 },
                AttributeBlock { kind: EdgeKind::Distance, offset: 3, width: 1 },
                AttributeBlock { kind: EdgeKind::KNearest, offset: 4, width: 1 },
            ]
        );
        assert_eq!(tensors.edge_attr[0], vec![0.0, 0.0, 0.0, 3.8, 0.0]);
        assert_eq!(tensors.edge_attr[1], vec![0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(tensors.edge_attr[2], vec![0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn tensor_rows_include_codes_and_secondary_structure() {
        let mut g = graph();
        g.attach_features(AlignedFeatures {
            ss: vec![[0.0; SS_DIMENSION]; 3],
            asa: vec![10.0, 20.0, 30.0],
            rsa: vec![0.1, 0.2, 0.3],
        })
        .unwrap();
        let tensors = TensorGraph::from_encoded(&g.encode_labels());
        let row = &tensors.x[2];
        assert_eq!(row.len(), 2 + 7 + 3 + SS_DIMENSION + 2);
        assert_eq!(row[1], 2.0);
        assert_eq!(row[row.len() - 2..], [30.0, 0.3]);
    }

    #[test]
    fn summary_counts_edges_by_kind() {
        let summary = graph().summary();
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.edges, 3);
        assert_eq!(
            summary.to_string(),
            "3 nodes, 3 edges (rel_type: 1, dist: 1, k_nn_dist: 1)"
        );
    }

    #[test]
    fn petgraph_preserves_indices_and_attributes() {
        let g = graph().to_petgraph();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        let first = g.edge_references().next().unwrap();
        assert_eq!(first.source().index(), 1);
        assert_eq!(first.target().index(), 0);
        assert_eq!(*first.weight(), EdgeAttribute::Distance(3.8));
        assert_eq!(g[first.target()], NodeId::residue('A', "GLY", 1));
    }
}
