//! Cell measures used to verify node orderings.
//!
//! The reference orderings match what PFLOTRAN expects after reorientation:
//! - Triangle: `[v0, v1, v2]`.
//! - Quadrilateral: `[v0, v1, v2, v3]` in convex winding.
//! - Tetrahedron: `[v0, v1, v2, v3]` with `v3` on the positive side of `v0 v1 v2`.
//! - Pyramid: base `[v0, v1, v2, v3]`, apex `v4` on the base's positive side.
//! - Wedge: bottom triangle `[v0, v1, v2]`, top `[v3, v4, v5]`, `v3` above `v0`.
//! - Hexahedron: bottom `[v0, v1, v2, v3]`, top `[v4, v5, v6, v7]`, `v4` above `v0`.
//!
//! "Positive side" means the side the right-hand normal of the first face
//! points to, so a correctly ordered cell has a positive signed volume.

use crate::geometry::vector::{Vec3, cross, norm, triple_product, vector};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;

const EPS: f64 = 1e-12;

/// Signed volume of the tetrahedron `abcd`; positive when `d` lies on the
/// right-hand side of `abc`.
#[inline]
pub fn signed_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f64 {
    triple_product(a, b, c, d) / 6.0
}

/// Signed volume (3D) or signed area along the first normal (2D) of a cell.
///
/// 2D cells report their unsigned area, since a face alone carries no
/// orientation relative to a volume.
pub fn cell_signed_volume(cell_type: CellType, vertices: &[Vec3]) -> Result<f64, MeshError> {
    let expected = cell_type.vertex_count();
    if vertices.len() != expected {
        return Err(MeshError::InvalidGeometry(format!(
            "vertex count mismatch for {}: expected {expected}, got {}",
            cell_type.name(),
            vertices.len()
        )));
    }
    let v = vertices;
    match cell_type {
        CellType::Segment => Ok(norm(vector(v[0], v[1]))),
        CellType::Triangle => Ok(0.5 * norm(cross(vector(v[0], v[1]), vector(v[0], v[2])))),
        CellType::Quadrilateral => Ok(0.5 * norm(cross(vector(v[0], v[2]), vector(v[1], v[3])))),
        CellType::Tetrahedron => Ok(signed_volume(v[0], v[1], v[2], v[3])),
        CellType::Pyramid => Ok(signed_volume(v[0], v[1], v[2], v[4])
            + signed_volume(v[0], v[2], v[3], v[4])),
        CellType::Wedge => Ok(signed_volume(v[0], v[1], v[2], v[3])
            + signed_volume(v[1], v[4], v[2], v[3])
            + signed_volume(v[2], v[4], v[5], v[3])),
        CellType::Hexahedron => Ok(signed_volume(v[0], v[1], v[3], v[4])
            + signed_volume(v[1], v[2], v[3], v[6])
            + signed_volume(v[1], v[3], v[4], v[6])
            + signed_volume(v[1], v[4], v[5], v[6])
            + signed_volume(v[3], v[4], v[6], v[7])),
    }
}

/// Unit normal of the plane through `a`, `b`, `c` (right-hand winding).
pub fn unit_normal(a: Vec3, b: Vec3, c: Vec3) -> Result<Vec3, MeshError> {
    let n = cross(vector(a, b), vector(a, c));
    let len = norm(n);
    if !(len > EPS) {
        return Err(MeshError::InvalidGeometry("degenerate normal".into()));
    }
    Ok([n[0] / len, n[1] / len, n[2] / len])
}

/// Unit normal of a polygonal face given in winding order.
///
/// Uses Newell's method so that slightly warped quads still get a stable
/// direction; for triangles this equals [`unit_normal`].
pub fn face_normal(points: &[Vec3]) -> Result<Vec3, MeshError> {
    if points.len() < 3 {
        return Err(MeshError::InvalidGeometry(
            "face has fewer than 3 vertices".into(),
        ));
    }
    let mut n = [0.0; 3];
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        n[0] += (p[1] - q[1]) * (p[2] + q[2]);
        n[1] += (p[2] - q[2]) * (p[0] + q[0]);
        n[2] += (p[0] - q[0]) * (p[1] + q[1]);
    }
    let len = norm(n);
    if !(len > EPS) {
        return Err(MeshError::InvalidGeometry("degenerate normal".into()));
    }
    Ok([n[0] / len, n[1] / len, n[2] / len])
}
