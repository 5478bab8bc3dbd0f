//! In-memory mesh: a vertex table plus an ordered element list.
//!
//! Elements keep the order in which they were read, because PFLOTRAN numbers
//! cells implicitly by their position in the output.

use crate::data::coordinates::Coordinates;
use crate::geometry::vector::Vec3;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::point::PointId;
use std::collections::HashMap;

/// One mesh element. Vertices are referenced by id only.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: PointId,
    pub cell_type: CellType,
    /// Ordered vertex ids; the order defines face winding.
    pub nodes: Vec<PointId>,
}

impl Element {
    pub fn new(id: PointId, cell_type: CellType, nodes: Vec<PointId>) -> Self {
        Self {
            id,
            cell_type,
            nodes,
        }
    }
}

/// Vertex table plus elements, with the referential invariants enforced on
/// insertion: unique vertex ids, unique element ids, no dangling vertex ids.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    coordinates: Coordinates,
    elements: Vec<Element>,
    index: HashMap<PointId, usize>,
}

impl Mesh {
    /// Creates a mesh over an existing vertex table, with no elements.
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            elements: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends an element after checking its ids.
    ///
    /// # Errors
    /// - [`MeshError::DuplicateElement`] if the id is already used.
    /// - [`MeshError::MissingVertex`] if a node is not in the vertex table.
    /// - [`MeshError::InvalidGeometry`] if the node count does not match the type.
    pub fn try_add_element(&mut self, element: Element) -> Result<(), MeshError> {
        if self.index.contains_key(&element.id) {
            return Err(MeshError::DuplicateElement(element.id));
        }
        if element.nodes.len() != element.cell_type.vertex_count() {
            return Err(MeshError::InvalidGeometry(format!(
                "element {} is a {} with {} nodes, expected {}",
                element.id,
                element.cell_type.name(),
                element.nodes.len(),
                element.cell_type.vertex_count()
            )));
        }
        if let Some(&vertex) = element
            .nodes
            .iter()
            .find(|&&v| !self.coordinates.contains(v))
        {
            return Err(MeshError::MissingVertex {
                element: element.id,
                vertex,
            });
        }
        self.index.insert(element.id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    #[inline]
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Elements in insertion order.
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: PointId) -> Option<&Element> {
        self.index.get(&id).map(|&i| &self.elements[i])
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Coordinates of an element's nodes, in node order.
    pub fn element_vertices(&self, element: &Element) -> Result<Vec<Vec3>, MeshError> {
        self.coordinates.gather(element.id, &element.nodes)
    }

    /// Elements of dimension 3, in insertion order.
    pub fn volume_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter().filter(|e| e.cell_type.is_volume())
    }

    /// Highest topological dimension present (0 for an element-free mesh).
    pub fn max_dimension(&self) -> u8 {
        self.elements
            .iter()
            .map(|e| e.cell_type.dimension())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u64) -> PointId {
        PointId::new(raw).unwrap()
    }

    fn unit_tet_mesh() -> Mesh {
        let coords: Coordinates = [
            (pid(1), [0.0, 0.0, 0.0]),
            (pid(2), [1.0, 0.0, 0.0]),
            (pid(3), [0.0, 1.0, 0.0]),
            (pid(4), [0.0, 0.0, 1.0]),
        ]
        .into_iter()
        .collect();
        Mesh::new(coords)
    }

    #[test]
    fn add_and_lookup() {
        let mut mesh = unit_tet_mesh();
        let nodes = vec![pid(1), pid(2), pid(3), pid(4)];
        mesh.try_add_element(Element::new(pid(10), CellType::Tetrahedron, nodes.clone()))
            .unwrap();
        mesh.try_add_element(Element::new(
            pid(11),
            CellType::Triangle,
            vec![pid(1), pid(2), pid(3)],
        ))
        .unwrap();
        assert_eq!(mesh.element(pid(10)).unwrap().nodes, nodes);
        assert_eq!(mesh.volume_elements().count(), 1);
        assert_eq!(mesh.max_dimension(), 3);
    }

    #[test]
    fn invariants_are_enforced() {
        let mut mesh = unit_tet_mesh();
        let tet = Element::new(pid(1), CellType::Tetrahedron, vec![pid(1), pid(2), pid(3), pid(4)]);
        mesh.try_add_element(tet.clone()).unwrap();
        assert_eq!(
            mesh.try_add_element(tet),
            Err(MeshError::DuplicateElement(pid(1)))
        );
        let dangling = Element::new(pid(2), CellType::Triangle, vec![pid(1), pid(2), pid(7)]);
        assert_eq!(
            mesh.try_add_element(dangling),
            Err(MeshError::MissingVertex {
                element: pid(2),
                vertex: pid(7)
            })
        );
        let short = Element::new(pid(3), CellType::Hexahedron, vec![pid(1), pid(2)]);
        assert!(matches!(
            mesh.try_add_element(short),
            Err(MeshError::InvalidGeometry(_))
        ));
    }
}
