use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeEndpoint, EdgeStrategy};
use crate::core::io::edges::{self, CustomEdgeRow};
use crate::engine::error::GraphError;
use std::path::Path;

/// A user-supplied edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEdge {
    pub source: EdgeEndpoint,
    pub target: EdgeEndpoint,
    pub data: Vec<f64>,
}

impl CustomEdge {
    pub fn new(source: impl Into<EdgeEndpoint>, target: impl Into<EdgeEndpoint>, data: Vec<f64>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            data,
        }
    }
}

impl TryFrom<CustomEdgeRow> for CustomEdge {
    type Error = GraphError;

    fn try_from(row: CustomEdgeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            source: row.source.parse()?,
            target: row.target.parse()?,
            data: row.data,
        })
    }
}

/// Passes user-supplied edges through unchanged.
///
/// Sequence separation is not applied: the caller decided these edges exist.
#[derive(Debug, Clone, Default)]
pub struct CustomEdges {
    edges: Vec<CustomEdge>,
}

impl CustomEdges {
    pub fn new(edges: Vec<CustomEdge>) -> Self {
        Self { edges }
    }

    /// Loads edges from a `res1,res2,data...` CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let rows = edges::read_from_path(path)?;
        let edges = rows
            .into_iter()
            .map(CustomEdge::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl EdgeStrategy for CustomEdges {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn edges(&self, _ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        Ok(self
            .edges
            .iter()
            .map(|e| EdgeCandidate {
                source: e.source.clone(),
                target: e.target.clone(),
                attribute: EdgeAttribute::Custom(e.data.clone()),
            })
            .collect())
    }
}
