use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeStrategy};
use crate::engine::error::GraphError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Edges between nodes closer than a cutoff.
///
/// Only the lower triangle of the distance matrix is visited, so each pair yields one
/// edge from the later node (`i`) to the earlier one (`j < i`). Coincident nodes
/// (distance zero) are never connected.
pub struct DistanceEdges {
    cutoff: f64,
}

impl DistanceEdges {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    fn row(&self, ctx: &EdgeContext, i: usize) -> Vec<EdgeCandidate> {
        let p = &ctx.positions[i];
        (0..i)
            .filter_map(|j| {
                let d = (p - ctx.positions[j]).norm();
                (d < self.cutoff && d != 0.0 && ctx.separated(i, j))
                    .then(|| EdgeCandidate::new(i, j, EdgeAttribute::Distance(d)))
            })
            .collect()
    }
}

impl EdgeStrategy for DistanceEdges {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        #[cfg(not(feature = "parallel"))]
        let rows = (0..ctx.len()).map(|i| self.row(ctx, i));

        #[cfg(feature = "parallel")]
        let rows = (0..ctx.len())
            .into_par_iter()
            .map(|i| self.row(ctx, i))
            .collect::<Vec<_>>()
            .into_iter();

        Ok(rows.flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Granularity;
    use crate::engine::edges::EdgeEndpoint;
    use crate::engine::edges::test_support::{ca_records, ids_of};

    fn positions() -> [[f64; 3]; 4] {
        [
            [0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0],
            [0.0, 4.0, 0.0],
            [20.0, 0.0, 0.0],
        ]
    }

    fn run(cutoff: f64, separation: Option<usize>) -> Vec<EdgeCandidate> {
        let records = ca_records(&positions());
        let ids = ids_of(&records);
        let granularity = Granularity::default();
        let ctx = EdgeContext::new(&records, &ids, &granularity, separation);
        DistanceEdges::new(cutoff).edges(&ctx).unwrap()
    }

    #[test]
    fn connects_pairs_below_cutoff_in_lower_triangle() {
        let edges = run(5.5, None);
        let pairs: Vec<_> = edges
            .iter()
            .map(|e| match (&e.source, &e.target) {
                (EdgeEndpoint::Index(i), EdgeEndpoint::Index(j)) => (*i, *j),
                _ => panic!("distance edges address nodes by index"),
            })
            .collect();
        assert_eq!(pairs, vec![(1, 0), (2, 0), (2, 1)]);
        assert_eq!(edges[2].attribute, EdgeAttribute::Distance(5.0));
    }

    #[test]
    fn cutoff_is_exclusive() {
        let edges = run(5.0, None);
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| match e.attribute {
            EdgeAttribute::Distance(d) => d < 5.0,
            _ => false,
        }));
    }

    #[test]
    fn coincident_nodes_are_not_connected() {
        let records = ca_records(&[[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        let ids = ids_of(&records);
        let granularity = Granularity::default();
        let ctx = EdgeContext::new(&records, &ids, &granularity, None);
        assert!(DistanceEdges::new(10.0).edges(&ctx).unwrap().is_empty());
    }

    #[test]
    fn sequence_separation_filters_close_residues() {
        // Residue numbers are 1..=4; only the pair (3, 1) is more than one apart.
        let edges = run(5.5, Some(1));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, EdgeEndpoint::Index(2));
        assert_eq!(edges[0].target, EdgeEndpoint::Index(0));
    }
}
