//! Primitive 3D vector operations on `[f64; 3]`.
//!
//! Everything here is pure and total. Non-finite inputs propagate to the
//! result; callers validate coordinates before relying on signs.

/// Default tolerance for [`is_coplanar`].
pub const COPLANAR_TOLERANCE: f64 = 1e-8;

/// A point or direction in 3D space.
pub type Vec3 = [f64; 3];

/// Vector from `a` to `b` (`b - a`).
#[inline]
pub fn vector(a: Vec3, b: Vec3) -> Vec3 {
    [b[0] - a[0], b[1] - a[1], b[2] - a[2]]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Scalar triple product `(b - a) . ((c - a) x (d - a))`.
///
/// Six times the signed volume of the tetrahedron `abcd`.
#[inline]
pub fn triple_product(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f64 {
    dot(vector(a, b), cross(vector(a, c), vector(a, d)))
}

/// Returns `true` when the four points lie in one plane within `tol`.
///
/// The test is `|triple_product(a, b, c, d)| < tol`, which is invariant (up to
/// sign) under any permutation of the four points.
#[inline]
pub fn is_coplanar(a: Vec3, b: Vec3, c: Vec3, d: Vec3, tol: f64) -> bool {
    triple_product(a, b, c, d).abs() < tol
}

/// Arithmetic mean of the given points. Returns the origin for an empty slice.
pub fn centroid(points: &[Vec3]) -> Vec3 {
    if points.is_empty() {
        return [0.0; 3];
    }
    let mut sum = [0.0; 3];
    for p in points {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
    }
    let n = points.len() as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Largest distance between any two of `points`; zero for fewer than two.
pub fn diameter(points: &[Vec3]) -> f64 {
    let mut longest = 0.0_f64;
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            longest = longest.max(norm(vector(a, b)));
        }
    }
    longest
}

#[inline]
pub fn is_finite(a: Vec3) -> bool {
    a.iter().all(|c| c.is_finite())
}
