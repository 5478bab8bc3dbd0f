//! Vertex coordinate storage.
//!
//! Coordinates are stored per vertex id in ascending id order, which is also
//! the order PFLOTRAN expects in the vertex block.

use crate::geometry::vector::Vec3;
use crate::mesh_error::MeshError;
use crate::topology::point::PointId;
use std::collections::{BTreeMap, HashMap};

/// Vertex table: `PointId -> [x, y, z]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates {
    points: BTreeMap<PointId, Vec3>,
}

impl Coordinates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a vertex.
    ///
    /// # Errors
    /// [`MeshError::DuplicateVertex`] when the id is already present.
    pub fn try_insert(&mut self, id: PointId, xyz: Vec3) -> Result<(), MeshError> {
        if self.points.contains_key(&id) {
            return Err(MeshError::DuplicateVertex(id));
        }
        self.points.insert(id, xyz);
        Ok(())
    }

    /// Dense `1..=n` numbering for a table whose ids have gaps.
    ///
    /// Returns `None` when the ids already are exactly `1..=n`. Otherwise maps
    /// every id to its 1-based rank in ascending order.
    pub fn renumbering(&self) -> Option<HashMap<PointId, PointId>> {
        let contiguous = self
            .points
            .keys()
            .enumerate()
            .all(|(i, id)| id.get() == i as u64 + 1);
        if contiguous {
            return None;
        }
        self.points
            .keys()
            .enumerate()
            .map(|(i, &id)| PointId::new(i as u64 + 1).ok().map(|dense| (id, dense)))
            .collect()
    }

    /// Coordinates of a vertex, if present.
    #[inline]
    pub fn get(&self, id: PointId) -> Option<Vec3> {
        self.points.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates vertices in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, Vec3)> + '_ {
        self.points.iter().map(|(id, xyz)| (*id, *xyz))
    }

    /// Gathers the coordinates of `ids`, in order.
    ///
    /// `owner` is the element the ids belong to and only appears in the error.
    pub fn gather(&self, owner: PointId, ids: &[PointId]) -> Result<Vec<Vec3>, MeshError> {
        ids.iter()
            .map(|&vertex| {
                self.get(vertex)
                    .ok_or(MeshError::MissingVertex { element: owner, vertex })
            })
            .collect()
    }
}

impl FromIterator<(PointId, Vec3)> for Coordinates {
    /// Builds a table, keeping the last coordinates on duplicate ids.
    fn from_iter<I: IntoIterator<Item = (PointId, Vec3)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
