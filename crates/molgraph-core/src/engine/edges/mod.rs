//! Edge construction strategies.
//!
//! Every strategy implements [`EdgeStrategy`] and produces [`EdgeCandidate`]s from the
//! same read-only [`EdgeContext`]. Candidates address their endpoints either by node
//! index (geometric strategies) or by [`NodeId`] (contacts, custom edges); the graph
//! assembler resolves identities and silently drops candidates that reference nodes
//! absent from the graph.
//!
//! Strategies are independent and additive: running several of them yields the union
//! of their edges, including parallel edges of different kinds between the same pair.

pub mod contacts;
pub mod custom;
pub mod delaunay;
pub mod dense;
pub mod distance;
pub mod knn;

use super::config::Granularity;
use super::error::GraphError;
use crate::core::models::identity::NodeId;
use crate::core::models::record::AtomRecord;
use nalgebra::Point3;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub use contacts::ContactEdges;
pub use custom::{CustomEdge, CustomEdges};
pub use delaunay::DelaunayEdges;
pub use dense::DenseEdges;
pub use distance::DistanceEdges;
pub use knn::KnnEdges;

/// The relation a graph edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Interaction,
    Distance,
    KNearest,
    Delaunay,
    Custom,
    Dense,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 6] = [
        EdgeKind::Interaction,
        EdgeKind::Distance,
        EdgeKind::KNearest,
        EdgeKind::Delaunay,
        EdgeKind::Custom,
        EdgeKind::Dense,
    ];

    /// Attribute key used when the edge is exported.
    pub const fn export_name(&self) -> &'static str {
        match self {
            EdgeKind::Interaction => "rel_type",
            EdgeKind::Distance => "dist",
            EdgeKind::KNearest => "k_nn_dist",
            EdgeKind::Delaunay => "delaunay_euclidean_distance",
            EdgeKind::Custom => "user_edge_data",
            EdgeKind::Dense => "dense",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.export_name())
    }
}

/// The attribute carried by an edge; the variant determines the edge kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeAttribute {
    /// One-hot interaction type over the whitelist.
    Interaction(Vec<f64>),
    /// Euclidean distance below the cutoff.
    Distance(f64),
    /// Euclidean distance to a k-nearest neighbour.
    KnnDistance(f64),
    /// Neighbour indicator.
    KnnConnectivity,
    /// Euclidean distance between Delaunay neighbours.
    Delaunay(f64),
    /// User-supplied values.
    Custom(Vec<f64>),
    Dense,
}

impl EdgeAttribute {
    pub fn kind(&self) -> EdgeKind {
        match self {
            EdgeAttribute::Interaction(_) => EdgeKind::Interaction,
            EdgeAttribute::Distance(_) => EdgeKind::Distance,
            EdgeAttribute::KnnDistance(_) | EdgeAttribute::KnnConnectivity => EdgeKind::KNearest,
            EdgeAttribute::Delaunay(_) => EdgeKind::Delaunay,
            EdgeAttribute::Custom(_) => EdgeKind::Custom,
            EdgeAttribute::Dense => EdgeKind::Dense,
        }
    }

    /// Numeric values of the attribute.
    pub fn values(&self) -> Vec<f64> {
        match self {
            EdgeAttribute::Interaction(v) | EdgeAttribute::Custom(v) => v.clone(),
            EdgeAttribute::Distance(d) | EdgeAttribute::KnnDistance(d) | EdgeAttribute::Delaunay(d) => {
                vec![*d]
            }
            EdgeAttribute::KnnConnectivity | EdgeAttribute::Dense => vec![1.0],
        }
    }
}

/// How a candidate edge names one of its endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeEndpoint {
    Index(usize),
    Id(NodeId),
}

impl FromStr for EdgeEndpoint {
    type Err = GraphError;

    /// Parses a node index (`12`) or a node identity (`A:LEU:42`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Ok(EdgeEndpoint::Index(index));
        }
        s.parse::<NodeId>()
            .map(EdgeEndpoint::Id)
            .map_err(|e| GraphError::Precondition(format!("invalid edge endpoint: {}", e)))
    }
}

impl From<usize> for EdgeEndpoint {
    fn from(index: usize) -> Self {
        EdgeEndpoint::Index(index)
    }
}

impl From<NodeId> for EdgeEndpoint {
    fn from(id: NodeId) -> Self {
        EdgeEndpoint::Id(id)
    }
}

/// An edge proposed by a strategy, not yet resolved against the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCandidate {
    pub source: EdgeEndpoint,
    pub target: EdgeEndpoint,
    pub attribute: EdgeAttribute,
}

impl EdgeCandidate {
    pub fn new(
        source: impl Into<EdgeEndpoint>,
        target: impl Into<EdgeEndpoint>,
        attribute: EdgeAttribute,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            attribute,
        }
    }
}

/// Read-only view of the node set shared by all strategies.
pub struct EdgeContext<'a> {
    pub records: &'a [AtomRecord],
    pub ids: &'a [NodeId],
    pub positions: Vec<Point3<f64>>,
    pub granularity: &'a Granularity,
    pub sequence_separation: Option<usize>,
}

impl<'a> EdgeContext<'a> {
    pub fn new(
        records: &'a [AtomRecord],
        ids: &'a [NodeId],
        granularity: &'a Granularity,
        sequence_separation: Option<usize>,
    ) -> Self {
        Self {
            records,
            ids,
            positions: records.iter().map(|r| r.position).collect(),
            granularity,
            sequence_separation,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether nodes `i` and `j` are far enough apart in sequence.
    pub fn separated(&self, i: usize, j: usize) -> bool {
        passes_separation(
            self.records[i].residue_number,
            self.records[j].residue_number,
            self.sequence_separation,
        )
    }
}

/// A source of candidate edges.
pub trait EdgeStrategy {
    fn name(&self) -> &'static str;

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError>;
}

/// `true` when no threshold is set or `|n1 - n2| > threshold`.
pub fn passes_separation(n1: isize, n2: isize, threshold: Option<usize>) -> bool {
    match threshold {
        None => true,
        Some(t) => n1.abs_diff(n2) > t,
    }
}
