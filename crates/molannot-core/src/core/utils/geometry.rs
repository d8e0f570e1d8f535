use nalgebra::{Point3, Vector3};

/// Computes the torsion angle defined by four points, in radians.
///
/// The result lies in `[-π, π]`. Degenerate inputs (collinear or repeated
/// points) evaluate to `0.0`.
pub fn dihedral(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>, p4: &Point3<f64>) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = (b1 * b2.norm()).dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x)
}

/// Same as [`dihedral`], in degrees.
pub fn dihedral_degrees(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    dihedral(p1, p2, p3, p4).to_degrees()
}

/// Angle at `vertex` formed by `a` and `c`, in radians.
///
/// Returns `0.0` when either arm has zero length.
pub fn angle_between(a: &Point3<f64>, vertex: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = a - vertex;
    let v = c - vertex;
    let denom = u.norm() * v.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (u.dot(&v) / denom).clamp(-1.0, 1.0).acos()
}

/// Arithmetic mean of a set of points, or `None` for an empty slice.
pub fn average_point(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Normal of the plane through three points, `(b - a) x (c - a)`.
pub fn plane_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

#[cfg(test)]
pub(crate) mod test_support {
    use nalgebra::{Point3, Vector3};

    /// Places a fourth point from internal coordinates relative to `a`, `b`, `c`.
    ///
    /// The returned point `d` satisfies `|cd| = bond`, `angle(b, c, d) = angle_deg`
    /// and `dihedral(a, b, c, d) = torsion_deg`.
    pub fn place_atom(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        bond: f64,
        angle_deg: f64,
        torsion_deg: f64,
    ) -> Point3<f64> {
        let bc: Vector3<f64> = (c - b).normalize();
        let n = (b - a).cross(&bc).normalize();
        let m = n.cross(&bc);

        let angle = angle_deg.to_radians();
        let torsion = torsion_deg.to_radians();
        let d2 = Vector3::new(
            -bond * angle.cos(),
            bond * angle.sin() * torsion.cos(),
            bond * angle.sin() * torsion.sin(),
        );
        c + bc * d2.x + m * d2.y + n * d2.z
    }
}
