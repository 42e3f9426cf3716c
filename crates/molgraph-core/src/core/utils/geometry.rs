use nalgebra::{Point3, Vector3};

/// Determinant threshold below which four points are treated as coplanar.
pub const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// Arithmetic mean of a set of points, `None` for an empty set.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Center and squared radius of the sphere through four points.
///
/// Returns `None` when the points are (nearly) coplanar.
pub fn circumsphere(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Option<(Point3<f64>, f64)> {
    let a = p1 - p0;
    let b = p2 - p0;
    let c = p3 - p0;

    let b_cross_c = b.cross(&c);
    let denom = 2.0 * a.dot(&b_cross_c);
    let scale = a.norm() * b.norm() * c.norm();
    if denom.abs() <= DEGENERACY_TOLERANCE * scale.max(1.0) {
        return None;
    }

    let offset = (b_cross_c * a.norm_squared()
        + c.cross(&a) * b.norm_squared()
        + a.cross(&b) * c.norm_squared())
        / denom;

    Some((p0 + offset, offset.norm_squared()))
}
