use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeStrategy};
use crate::engine::config::{ConfigError, KnnMode};
use crate::engine::error::GraphError;
use kiddo::{KdTree, SquaredEuclidean};

/// Edges from every node to its `k` nearest neighbours.
///
/// Each node contributes exactly `min(k, N - 1)` outgoing edges before the optional
/// sequence-separation filter is applied.
pub struct KnnEdges {
    k: usize,
    mode: KnnMode,
    include_self: bool,
}

impl KnnEdges {
    pub fn new(k: usize, mode: KnnMode) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "k_nn",
                reason: "k must be at least 1".to_string(),
            });
        }
        Ok(Self {
            k,
            mode,
            include_self: false,
        })
    }

    /// Counts each node as its own nearest neighbour.
    pub fn include_self(mut self, include: bool) -> Self {
        self.include_self = include;
        self
    }
}

impl EdgeStrategy for KnnEdges {
    fn name(&self) -> &'static str {
        "knn"
    }

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        if ctx.is_empty() {
            return Ok(Vec::new());
        }

        let points: Vec<[f64; 3]> = ctx.positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        let tree: KdTree<f64, 3> = (&points).into();
        let query_size = (self.k + 1).min(points.len());

        let mut candidates = Vec::with_capacity(points.len() * self.k);
        for (i, query) in points.iter().enumerate() {
            let neighbours = tree.nearest_n::<SquaredEuclidean>(query, query_size);
            let chosen = neighbours
                .into_iter()
                .filter(|nn| self.include_self || nn.item as usize != i)
                .take(self.k);

            for nn in chosen {
                let j = nn.item as usize;
                if !ctx.separated(i, j) {
                    continue;
                }
                let attribute = match self.mode {
                    KnnMode::Connectivity => EdgeAttribute::KnnConnectivity,
                    KnnMode::Distance => EdgeAttribute::KnnDistance(nn.distance.sqrt()),
                };
                candidates.push(EdgeCandidate::new(i, j, attribute));
            }
        }

        Ok(candidates)
    }
}
