use super::{EdgeAttribute, EdgeCandidate, EdgeContext, EdgeStrategy};
use crate::core::utils::geometry::circumsphere;
use crate::engine::error::GraphError;
use nalgebra::{Point3, Vector3};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Edge length of the enclosing tetrahedron, relative to the bounding-box extent.
const SUPER_SCALE: f64 = 1.0e3;

/// Edges between vertices that share a tetrahedron of the 3-D Delaunay tetrahedralisation.
///
/// Both directions of every adjacency are emitted, vertex by vertex, with each vertex's
/// neighbours in ascending order. Inputs with fewer than four points or with all points
/// coplanar have no tetrahedralisation and yield no edges.
#[derive(Debug, Default)]
pub struct DelaunayEdges;

impl DelaunayEdges {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone)]
struct Tetrahedron {
    vertices: [usize; 4],
    center: Point3<f64>,
    radius_sq: f64,
}

impl Tetrahedron {
    fn new(vertices: [usize; 4], points: &[Point3<f64>]) -> Option<Self> {
        let [a, b, c, d] = vertices;
        let (center, radius_sq) = circumsphere(&points[a], &points[b], &points[c], &points[d])?;
        Some(Self {
            vertices,
            center,
            radius_sq,
        })
    }

    fn circumsphere_contains(&self, p: &Point3<f64>) -> bool {
        (p - self.center).norm_squared() < self.radius_sq
    }

    fn faces(&self) -> [[usize; 3]; 4] {
        let [a, b, c, d] = self.vertices;
        [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
    }
}

/// Bowyer-Watson insertion of `points` into an enclosing tetrahedron.
///
/// Returns the tetrahedra whose four vertices are all input points.
fn tetrahedralize(points: &[Point3<f64>]) -> Vec<[usize; 4]> {
    let n = points.len();
    if n < 4 {
        return Vec::new();
    }

    let mut min = points[0].coords;
    let mut max = points[0].coords;
    for p in points {
        min = min.inf(&p.coords);
        max = max.sup(&p.coords);
    }
    let center = Point3::from((min + max) / 2.0);
    let scale = SUPER_SCALE * (max - min).max().max(1.0);

    let mut vertices = points.to_vec();
    vertices.extend([
        center + Vector3::new(1.0, 1.0, 1.0) * scale,
        center + Vector3::new(1.0, -1.0, -1.0) * scale,
        center + Vector3::new(-1.0, 1.0, -1.0) * scale,
        center + Vector3::new(-1.0, -1.0, 1.0) * scale,
    ]);

    let Some(enclosing) = Tetrahedron::new([n, n + 1, n + 2, n + 3], &vertices) else {
        return Vec::new();
    };
    let mut tetrahedra = vec![enclosing];

    for i in 0..n {
        let p = vertices[i];
        let (bad, good): (Vec<Tetrahedron>, Vec<Tetrahedron>) = tetrahedra
            .into_iter()
            .partition(|t| t.circumsphere_contains(&p));

        let mut face_counts: BTreeMap<[usize; 3], usize> = BTreeMap::new();
        for t in &bad {
            for mut face in t.faces() {
                face.sort_unstable();
                *face_counts.entry(face).or_insert(0) += 1;
            }
        }

        tetrahedra = good;
        let mut degenerate = 0usize;
        for ([a, b, c], _) in face_counts.into_iter().filter(|(_, count)| *count == 1) {
            match Tetrahedron::new([a, b, c, i], &vertices) {
                Some(t) => tetrahedra.push(t),
                None => degenerate += 1,
            }
        }
        if degenerate > 0 {
            debug!(
                "Skipped {} degenerate tetrahedra while inserting point {}.",
                degenerate, i
            );
        }
    }

    tetrahedra
        .into_iter()
        .map(|t| t.vertices)
        .filter(|v| v.iter().all(|&idx| idx < n))
        .collect()
}

/// Sorted neighbour lists of every vertex.
fn vertex_neighbours(n: usize, tetrahedra: &[[usize; 4]]) -> Vec<BTreeSet<usize>> {
    let mut neighbours = vec![BTreeSet::new(); n];
    for tet in tetrahedra {
        for (k, &a) in tet.iter().enumerate() {
            for &b in &tet[k + 1..] {
                neighbours[a].insert(b);
                neighbours[b].insert(a);
            }
        }
    }
    neighbours
}

impl EdgeStrategy for DelaunayEdges {
    fn name(&self) -> &'static str {
        "delaunay"
    }

    fn edges(&self, ctx: &EdgeContext) -> Result<Vec<EdgeCandidate>, GraphError> {
        let tetrahedra = tetrahedralize(&ctx.positions);
        if tetrahedra.is_empty() {
            warn!(
                "No Delaunay tetrahedralisation for {} nodes (fewer than 4 or coplanar).",
                ctx.len()
            );
            return Ok(Vec::new());
        }
        debug!("Delaunay tetrahedralisation has {} cells.", tetrahedra.len());

        let neighbours = vertex_neighbours(ctx.len(), &tetrahedra);
        let mut candidates = Vec::new();
        for (i, adjacent) in neighbours.iter().enumerate() {
            for &j in adjacent {
                if !ctx.separated(i, j) {
                    continue;
                }
                let d = (ctx.positions[i] - ctx.positions[j]).norm();
                candidates.push(EdgeCandidate::new(i, j, EdgeAttribute::Delaunay(d)));
            }
        }
        Ok(candidates)
    }
}
