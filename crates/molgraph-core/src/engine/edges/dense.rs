use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeStrategy};
use crate::engine::error::GraphError;
use itertools::Itertools;

/// Connects every ordered pair of distinct nodes.
#[derive(Debug, Default)]
pub struct DenseEdges;

impl DenseEdges {
    pub fn new() -> Self {
        Self
    }
}

impl EdgeStrategy for DenseEdges {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        Ok((0..ctx.len())
            .cartesian_product(0..ctx.len())
            .filter(|(i, j)| i != j && ctx.separated(*i, *j))
            .map(|(i, j)| EdgeCandidate::new(i, j, EdgeAttribute::Dense))
            .collect())
    }
}
