use petgraph::graph::DiGraph;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Base alphabet for node features; the last entry is the unknown class.
pub const BASES: [char; 5] = ['A', 'U', 'G', 'C', 'I'];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RnaError {
    #[error("Invalid symbol '{symbol}' at position {position} (expected '(', ')' or '.')")]
    InvalidSymbol { position: usize, symbol: char },

    #[error("Closing bracket at position {position} has no matching opening bracket")]
    UnmatchedClosing { position: usize },

    #[error("Opening bracket at position {position} is never closed")]
    UnmatchedOpening { position: usize },

    #[error("Sequence length {sequence} does not match structure length {structure}")]
    LengthMismatch { structure: usize, sequence: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RnaEdgeKind {
    Backbone,
    BasePair,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RnaNode {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<[f64; 5]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RnaEdge {
    pub source: usize,
    pub target: usize,
    pub kind: RnaEdgeKind,
}

/// A secondary-structure graph of one RNA molecule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RnaGraph {
    pub dotbracket: String,
    pub nodes: Vec<RnaNode>,
    pub edges: Vec<RnaEdge>,
}

impl RnaGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_of_kind(&self, kind: RnaEdgeKind) -> impl Iterator<Item = &RnaEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn to_petgraph(&self) -> DiGraph<RnaNode, RnaEdgeKind> {
        let mut g = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<_> = self.nodes.iter().map(|n| g.add_node(n.clone())).collect();
        for edge in &self.edges {
            g.add_edge(indices[edge.source], indices[edge.target], edge.kind);
        }
        g
    }
}

/// One-hot encoding over [`BASES`]; letters outside the alphabet use the `I` slot.
pub fn base_one_hot(base: char) -> [f64; 5] {
    let base = base.to_ascii_uppercase();
    let slot = BASES
        .iter()
        .position(|&b| b == base)
        .unwrap_or(BASES.len() - 1);
    let mut v = [0.0; 5];
    v[slot] = 1.0;
    v
}

/// Builds RNA graphs from dot-bracket notation.
///
/// Every position is a node. Consecutive positions are joined by a backbone edge
/// `(i, i - 1)`; each `)` is joined to the most recent unmatched `(` by a base-pair edge
/// `(i, j)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RnaGraphBuilder;

impl RnaGraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the graph, logging and discarding malformed input.
    pub fn build(&self, dotbracket: &str, sequence: Option<&str>) -> Option<RnaGraph> {
        match self.try_build(dotbracket, sequence) {
            Ok(graph) => Some(graph),
            Err(e) => {
                warn!("No RNA graph built for '{}': {}", dotbracket, e);
                None
            }
        }
    }

    /// Builds the graph.
    ///
    /// # Errors
    ///
    /// Returns an [`RnaError`] for symbols outside `()`, unbalanced brackets, or a
    /// sequence whose length differs from the structure.
    pub fn try_build(&self, dotbracket: &str, sequence: Option<&str>) -> Result<RnaGraph, RnaError> {
        let symbols: Vec<char> = dotbracket.chars().collect();
        let bases: Option<Vec<char>> = sequence.map(|s| s.chars().collect());

        if let Some(bases) = &bases {
            if bases.len() != symbols.len() {
                return Err(RnaError::LengthMismatch {
                    structure: symbols.len(),
                    sequence: bases.len(),
                });
            }
        }

        let mut edges = Vec::with_capacity(symbols.len() * 2);
        let mut open: Vec<usize> = Vec::new();
        for (i, &symbol) in symbols.iter().enumerate() {
            if i > 0 {
                edges.push(RnaEdge {
                    source: i,
                    target: i - 1,
                    kind: RnaEdgeKind::Backbone,
                });
            }
            match symbol {
                '(' => open.push(i),
                ')' => {
                    let j = open.pop().ok_or(RnaError::UnmatchedClosing { position: i })?;
                    edges.push(RnaEdge {
                        source: i,
                        target: j,
                        kind: RnaEdgeKind::BasePair,
                    });
                }
                '.' => {}
                other => {
                    return Err(RnaError::InvalidSymbol {
                        position: i,
                        symbol: other,
                    });
                }
            }
        }
        if let Some(&position) = open.first() {
            return Err(RnaError::UnmatchedOpening { position });
        }

        let nodes = (0..symbols.len())
            .map(|i| {
                let base = bases.as_ref().map(|b| b[i].to_ascii_uppercase());
                RnaNode {
                    index: i,
                    base,
                    features: base.map(base_one_hot),
                }
            })
            .collect();

        let graph = RnaGraph {
            dotbracket: dotbracket.to_string(),
            nodes,
            edges,
        };
        debug!(
            "RNA graph: {} nodes, {} base pairs.",
            graph.node_count(),
            graph.edges_of_kind(RnaEdgeKind::BasePair).count()
        );
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(graph: &RnaGraph) -> Vec<(usize, usize)> {
        graph
            .edges_of_kind(RnaEdgeKind::BasePair)
            .map(|e| (e.source, e.target))
            .collect()
    }

    #[test]
    fn hairpin_has_backbone_and_nested_pairs() {
        let graph = RnaGraphBuilder::new().try_build("((..))", None).unwrap();
        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edges_of_kind(RnaEdgeKind::Backbone).count(), 5);
        assert_eq!(pairs(&graph), vec![(4, 1), (5, 0)]);
        assert!(graph.nodes.iter().all(|n| n.features.is_none()));
    }

    #[test]
    fn backbone_edges_point_to_the_previous_position() {
        let graph = RnaGraphBuilder::new().try_build("...", None).unwrap();
        let backbone: Vec<_> = graph.edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(backbone, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn unbalanced_input_yields_no_graph() {
        let builder = RnaGraphBuilder::new();
        assert_eq!(
            builder.try_build("(()", None).unwrap_err(),
            RnaError::UnmatchedOpening { position: 0 }
        );
        assert_eq!(
            builder.try_build(".)", None).unwrap_err(),
            RnaError::UnmatchedClosing { position: 1 }
        );
        assert!(builder.build("(()", None).is_none());
    }

    #[test]
    fn unknown_symbols_abort_construction() {
        assert_eq!(
            RnaGraphBuilder::new().try_build("((.[))", None).unwrap_err(),
            RnaError::InvalidSymbol { position: 3, symbol: '[' }
        );
    }

    #[test]
    fn sequence_length_must_match() {
        assert!(matches!(
            RnaGraphBuilder::new().try_build("(.)", Some("AU")),
            Err(RnaError::LengthMismatch { structure: 3, sequence: 2 })
        ));
    }

    #[test]
    fn bases_are_one_hot_with_unknown_fallback() {
        assert_eq!(base_one_hot('A'), [1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(base_one_hot('c'), [0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(base_one_hot('T'), [0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(base_one_hot('N'), [0.0, 0.0, 0.0, 0.0, 1.0]);

        let graph = RnaGraphBuilder::new().try_build("(.)", Some("gXc")).unwrap();
        assert_eq!(graph.nodes[0].base, Some('G'));
        assert_eq!(graph.nodes[1].features, Some([0.0, 0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn petgraph_conversion_keeps_edge_kinds() {
        let graph = RnaGraphBuilder::new().try_build("(.)", None).unwrap().to_petgraph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.edge_weights().filter(|k| **k == RnaEdgeKind::BasePair).count(),
            1
        );
    }
}
