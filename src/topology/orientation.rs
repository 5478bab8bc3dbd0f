//! Right-hand-rule node ordering for PFLOTRAN cells.
//!
//! PFLOTRAN requires that the right-hand normal of a cell's first face points
//! into the cell, i.e. toward the remaining vertices. [`reorient`] returns a
//! permutation of an element's node ids that satisfies this convention:
//!
//! | cell        | first face          | rest                                   |
//! |-------------|---------------------|----------------------------------------|
//! | tetrahedron | `v0 v1 v2`          | `v3` on the positive side              |
//! | pyramid     | base `v0 v1 v2 v3`  | apex `v4` on the positive side         |
//! | wedge       | bottom `v0 v1 v2`   | top `v3 v4 v5`, `v3` joined to `v0`    |
//! | hexahedron  | bottom `v0 .. v3`   | top `v4 .. v7`, `v4` joined to `v0`    |
//!
//! Triangles and quads are passed through. Anything else is reported as
//! [`OrientationStatus::Unsupported`] and left untouched.
//!
//! All searches run on a fixed-size index array with an explicit iteration
//! budget ([`ReorientOptions::max_iterations`]); exhausting it is an error,
//! never an endless loop.

use crate::data::coordinates::Coordinates;
use crate::geometry::metrics::cell_signed_volume;
use crate::geometry::vector::{
    COPLANAR_TOLERANCE, Vec3, centroid, cross, diameter, dot, is_coplanar, is_finite, norm,
    triple_product, vector,
};
use crate::topology::cell_type::CellType;
use crate::topology::point::PointId;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for [`reorient`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorientOptions {
    /// Coplanarity tolerance on the scalar triple product, relative to the
    /// cube of the cell's diameter. The same setting works for cells of any
    /// size and at any distance from the origin.
    pub coplanar_tolerance: f64,
    /// Maximum number of search steps per element.
    pub max_iterations: usize,
}

impl Default for ReorientOptions {
    fn default() -> Self {
        Self {
            coplanar_tolerance: COPLANAR_TOLERANCE,
            max_iterations: 64,
        }
    }
}

/// What [`reorient`] did to an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrientationStatus {
    /// The input order already satisfied the convention.
    AlreadyOriented,
    /// The nodes were permuted.
    Reordered,
    /// No ordering rule exists for this topology; nodes left as given.
    Unsupported,
}

/// A node ordering produced by [`reorient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reoriented {
    pub nodes: Vec<PointId>,
    pub status: OrientationStatus,
}

/// Reasons an element could not be given a valid ordering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReorientError {
    #[error("a {} needs {expected} nodes, got {found}", cell.name())]
    NodeCount {
        cell: CellType,
        expected: usize,
        found: usize,
    },
    #[error("vertex {0} has no coordinates")]
    MissingVertex(PointId),
    #[error("vertex {0} has non-finite coordinates")]
    NonFinite(PointId),
    #[error("vertex {0} appears more than once")]
    RepeatedVertex(PointId),
    #[error("degenerate {}: {reason}", cell.name())]
    Degenerate {
        cell: CellType,
        reason: &'static str,
    },
    #[error("no valid {} ordering within {cap} search steps", cell.name())]
    IterationCapExceeded { cell: CellType, cap: usize },
}

/// Returns a right-hand-rule ordering of `nodes` for a cell of `cell_type`.
///
/// The result is always a permutation of `nodes`.
///
/// # Errors
/// See [`ReorientError`]. Topologies without an ordering rule are *not* an
/// error; they come back with [`OrientationStatus::Unsupported`].
pub fn reorient(
    cell_type: CellType,
    nodes: &[PointId],
    coordinates: &Coordinates,
    options: &ReorientOptions,
) -> Result<Reoriented, ReorientError> {
    let expected = cell_type.vertex_count();
    if nodes.len() != expected {
        return Err(ReorientError::NodeCount {
            cell: cell_type,
            expected,
            found: nodes.len(),
        });
    }
    let Some(rule) = ordering_rule(cell_type) else {
        let status = if cell_type.is_face() {
            OrientationStatus::AlreadyOriented
        } else {
            OrientationStatus::Unsupported
        };
        return Ok(Reoriented {
            nodes: nodes.to_vec(),
            status,
        });
    };

    let points = gather_points(nodes, coordinates)?;
    let mut search = Search {
        points: &points,
        tol: options.coplanar_tolerance * diameter(&points).powi(3),
        cell: cell_type,
        remaining: options.max_iterations,
        cap: options.max_iterations,
    };
    let perm = rule(&mut search)?;

    let ordered: Vec<Vec3> = perm.iter().map(|&i| points[i]).collect();
    let volume = cell_signed_volume(cell_type, &ordered).map_err(|_| ReorientError::Degenerate {
        cell: cell_type,
        reason: "cannot evaluate volume",
    })?;
    if !(volume > 0.0) {
        return Err(ReorientError::Degenerate {
            cell: cell_type,
            reason: "no ordering with positive volume",
        });
    }

    let status = if perm.iter().enumerate().all(|(i, &p)| i == p) {
        OrientationStatus::AlreadyOriented
    } else {
        OrientationStatus::Reordered
    };
    Ok(Reoriented {
        nodes: perm.iter().map(|&i| nodes[i]).collect(),
        status,
    })
}

type Rule<'a> = fn(&mut Search<'a>) -> Result<Vec<usize>, ReorientError>;

/// One ordering rule per volume topology. Faces and segments have none.
fn ordering_rule<'a>(cell_type: CellType) -> Option<Rule<'a>> {
    match cell_type {
        CellType::Tetrahedron => Some(Search::tetrahedron as Rule<'a>),
        CellType::Pyramid => Some(Search::pyramid as Rule<'a>),
        CellType::Wedge => Some(Search::wedge as Rule<'a>),
        CellType::Hexahedron => Some(Search::hexahedron as Rule<'a>),
        CellType::Segment | CellType::Triangle | CellType::Quadrilateral => None,
    }
}

fn gather_points(nodes: &[PointId], coordinates: &Coordinates) -> Result<Vec<Vec3>, ReorientError> {
    let mut points = Vec::with_capacity(nodes.len());
    for (i, &id) in nodes.iter().enumerate() {
        if nodes[..i].contains(&id) {
            return Err(ReorientError::RepeatedVertex(id));
        }
        let xyz = coordinates
            .get(id)
            .ok_or(ReorientError::MissingVertex(id))?;
        if !is_finite(xyz) {
            return Err(ReorientError::NonFinite(id));
        }
        points.push(xyz);
    }
    Ok(points)
}

/// Per-element search state. Indices refer to positions in `points`.
struct Search<'a> {
    points: &'a [Vec3],
    /// Triple-product threshold already scaled to this cell.
    tol: f64,
    cell: CellType,
    remaining: usize,
    cap: usize,
}

impl Search<'_> {
    fn tick(&mut self) -> Result<(), ReorientError> {
        if self.remaining == 0 {
            return Err(ReorientError::IterationCapExceeded {
                cell: self.cell,
                cap: self.cap,
            });
        }
        self.remaining -= 1;
        Ok(())
    }

    fn degenerate(&self, reason: &'static str) -> ReorientError {
        ReorientError::Degenerate {
            cell: self.cell,
            reason,
        }
    }

    #[inline]
    fn p(&self, i: usize) -> Vec3 {
        self.points[i]
    }

    fn coplanar(&self, a: usize, b: usize, c: usize, d: usize) -> bool {
        is_coplanar(self.p(a), self.p(b), self.p(c), self.p(d), self.tol)
    }

    /// Triple product of the plane `abc` against point `o`; the sign tells
    /// which side of the right-hand normal `o` lies on.
    fn side(&self, a: usize, b: usize, c: usize, o: usize) -> f64 {
        triple_product(self.p(a), self.p(b), self.p(c), self.p(o))
    }

    /// True when every point of `others` lies strictly on one side of `abc`.
    fn one_sided(&self, a: usize, b: usize, c: usize, others: &[usize]) -> bool {
        let sides: Vec<f64> = others.iter().map(|&o| self.side(a, b, c, o)).collect();
        sides.iter().all(|&s| s > self.tol) || sides.iter().all(|&s| s < -self.tol)
    }

    /// Corner normals of `q` all agree: a convex, non-self-intersecting winding.
    fn winding_consistent(&self, q: &[usize; 4]) -> bool {
        let corner = |i: usize| {
            let a = self.p(q[i]);
            let b = self.p(q[(i + 1) % 4]);
            let c = self.p(q[(i + 2) % 4]);
            cross(vector(a, b), vector(b, c))
        };
        let corners = [corner(0), corner(1), corner(2), corner(3)];
        (0..4).all(|i| dot(corners[i], corners[(i + 1) % 4]) > 0.0)
    }

    /// Reorders a quad into a convex winding, keeping `q[0]` in place.
    ///
    /// There are only three distinct cycles through four points; a swap of
    /// the last two, or of the middle two, reaches the other two.
    fn order_quad(&self, q: &mut [usize; 4]) -> bool {
        if self.winding_consistent(q) {
            return true;
        }
        q.swap(2, 3);
        if self.winding_consistent(q) {
            return true;
        }
        q.swap(2, 3);
        q.swap(1, 2);
        if self.winding_consistent(q) {
            return true;
        }
        q.swap(1, 2);
        false
    }

    fn face_normal(&self, a: usize, b: usize, c: usize) -> Vec3 {
        cross(vector(self.p(a), self.p(b)), vector(self.p(a), self.p(c)))
    }

    fn centroid_of(&self, idx: &[usize]) -> Vec3 {
        let pts: Vec<Vec3> = idx.iter().map(|&i| self.p(i)).collect();
        centroid(&pts)
    }

    fn tetrahedron(&mut self) -> Result<Vec<usize>, ReorientError> {
        let side = self.side(0, 1, 2, 3);
        if side.abs() < self.tol {
            return Err(self.degenerate("all four vertices are coplanar"));
        }
        if side > 0.0 {
            Ok(vec![0, 1, 2, 3])
        } else {
            Ok(vec![1, 0, 2, 3])
        }
    }

    fn pyramid(&mut self) -> Result<Vec<usize>, ReorientError> {
        // The apex is the vertex whose removal leaves the flattest quartet.
        let mut best: Option<(usize, f64)> = None;
        for apex in (0..5).rev() {
            self.tick()?;
            let base: Vec<usize> = (0..5).filter(|&i| i != apex).collect();
            let flatness = triple_product(
                self.p(base[0]),
                self.p(base[1]),
                self.p(base[2]),
                self.p(base[3]),
            )
            .abs();
            if best.is_none_or(|(_, f)| flatness < f) {
                best = Some((apex, flatness));
            }
        }
        let Some((apex, flatness)) = best else {
            return Err(self.degenerate("no base candidate"));
        };
        if !(flatness < self.tol) {
            return Err(self.degenerate("no planar quadrilateral base"));
        }

        let rest: Vec<usize> = (0..5).filter(|&i| i != apex).collect();
        let mut base = [rest[0], rest[1], rest[2], rest[3]];
        if !self.order_quad(&mut base) {
            return Err(self.degenerate("base is not a convex quadrilateral"));
        }
        if self.coplanar(base[0], base[1], base[2], apex) {
            return Err(self.degenerate("apex lies in the base plane"));
        }
        let normal = self.face_normal(base[0], base[1], base[2]);
        if dot(normal, vector(self.p(base[0]), self.p(apex))) < 0.0 {
            base.swap(1, 3);
        }
        Ok(vec![base[0], base[1], base[2], base[3], apex])
    }

    fn wedge(&mut self) -> Result<Vec<usize>, ReorientError> {
        // The two triangular faces are the only vertex triples whose plane
        // leaves every other vertex strictly on one side.
        let mut split: Option<([usize; 3], [usize; 3])> = None;
        for (a, b) in (1..6).tuple_combinations() {
            self.tick()?;
            let bottom = [0, a, b];
            let rest: Vec<usize> = (1..6).filter(|&i| i != a && i != b).collect();
            let top = [rest[0], rest[1], rest[2]];
            if self.one_sided(bottom[0], bottom[1], bottom[2], &top)
                && self.one_sided(top[0], top[1], top[2], &bottom)
            {
                split = Some((bottom, top));
                break;
            }
        }
        let Some((mut bottom, top)) = split else {
            return Err(self.degenerate("no pair of opposite triangular faces"));
        };

        let normal = self.face_normal(bottom[0], bottom[1], bottom[2]);
        let towards_top = vector(self.p(bottom[0]), self.centroid_of(&top));
        if dot(normal, towards_top) < 0.0 {
            bottom.swap(1, 2);
        }
        let normal = self.face_normal(bottom[0], bottom[1], bottom[2]);

        // Same-winding rotations of the top triangle; keep the one with the
        // shortest lateral edges.
        let mut best: Option<([usize; 3], f64)> = None;
        for perm in top.iter().copied().permutations(3) {
            self.tick()?;
            let t = [perm[0], perm[1], perm[2]];
            if dot(self.face_normal(t[0], t[1], t[2]), normal) <= 0.0 {
                continue;
            }
            let lateral: f64 = (0..3)
                .map(|i| norm(vector(self.p(bottom[i]), self.p(t[i]))))
                .sum();
            if best.is_none_or(|(_, len)| lateral < len) {
                best = Some((t, lateral));
            }
        }
        let Some((t, _)) = best else {
            return Err(self.degenerate("top face winding cannot match the bottom face"));
        };
        Ok(vec![bottom[0], bottom[1], bottom[2], t[0], t[1], t[2]])
    }

    fn hexahedron(&mut self) -> Result<Vec<usize>, ReorientError> {
        let mut w: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

        // 1 + 2: a face through w[0], w[1], w[2] and a coplanar fourth point,
        // with the other four strictly on one side. Rotating w[2..] cycles the
        // third point; after a full cycle w[1..] rotates to change the second.
        let mut rotations = 0;
        loop {
            self.tick()?;
            let found = (3..8).find(|&k| {
                let others: Vec<usize> = (3..8).filter(|&j| j != k).map(|j| w[j]).collect();
                self.coplanar(w[0], w[1], w[2], w[k]) && self.one_sided(w[0], w[1], w[2], &others)
            });
            if let Some(k) = found {
                w.swap(3, k);
                break;
            }
            rotations += 1;
            if rotations == 42 {
                return Err(self.degenerate("no planar quadrilateral face"));
            }
            w[2..].rotate_left(1);
            if rotations % 6 == 0 {
                w[1..].rotate_left(1);
            }
        }

        // 3: convex winding of the face.
        let mut face = [w[0], w[1], w[2], w[3]];
        if !self.order_quad(&mut face) {
            return Err(self.degenerate("face is not a convex quadrilateral"));
        }
        w[..4].copy_from_slice(&face);

        // 4: normal toward the opposite face.
        let opposite = self.centroid_of(&w[4..]);
        if dot(self.face_normal(w[0], w[1], w[2]), vector(self.p(w[0]), opposite)) < 0.0 {
            w.swap(1, 3);
        }
        let normal = self.face_normal(w[0], w[1], w[2]);

        // 5: opposite face in the same winding sense.
        let mut top = [w[4], w[5], w[6], w[7]];
        if !self.order_quad(&mut top) {
            return Err(self.degenerate("opposite face is not a convex quadrilateral"));
        }
        w[4..].copy_from_slice(&top);
        if dot(normal, self.face_normal(w[4], w[5], w[6])) < 0.0 {
            w.swap(5, 7);
        }

        // 6: rotate the opposite face until (w0, w4, w5, w1) is a side face.
        for _ in 0..4 {
            self.tick()?;
            let others = [w[2], w[3], w[6], w[7]];
            if self.coplanar(w[0], w[4], w[5], w[1]) && self.one_sided(w[0], w[1], w[4], &others) {
                return Ok(w.to_vec());
            }
            w[4..].rotate_left(1);
        }
        Err(self.degenerate("no planar side face joins the two quadrilaterals"))
    }
}
