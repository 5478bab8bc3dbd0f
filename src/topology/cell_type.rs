//! Cell type metadata for mesh elements.
//!
//! Salome encodes an element's family as `dim * 100 + node_count`
//! (e.g. `304` for a linear tetrahedron). PFLOTRAN's unstructured ASCII grid
//! uses a single letter per element instead.

use serde::{Deserialize, Serialize};

/// Element topologies understood by the converter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CellType {
    /// 1D segment/edge. Recognized in dumps, never written.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D pyramid: quad base plus apex.
    Pyramid,
    /// 3D wedge/prism: two triangles joined by three quads.
    Wedge,
    /// 3D tensor-product cell (hex).
    Hexahedron,
}

impl CellType {
    /// All cell types, in code order.
    pub const ALL: [CellType; 7] = [
        CellType::Segment,
        CellType::Triangle,
        CellType::Quadrilateral,
        CellType::Tetrahedron,
        CellType::Pyramid,
        CellType::Wedge,
        CellType::Hexahedron,
    ];

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Pyramid | CellType::Wedge | CellType::Hexahedron => {
                3
            }
        }
    }

    /// Number of vertices of a linear cell of this type.
    pub fn vertex_count(self) -> usize {
        match self {
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral | CellType::Tetrahedron => 4,
            CellType::Pyramid => 5,
            CellType::Wedge => 6,
            CellType::Hexahedron => 8,
        }
    }

    /// Salome DAT topology code (`dim * 100 + node_count`).
    pub fn salome_code(self) -> u32 {
        u32::from(self.dimension()) * 100 + self.vertex_count() as u32
    }

    /// Inverse of [`CellType::salome_code`]. Unknown codes yield `None`.
    pub fn from_salome_code(code: u32) -> Option<Self> {
        match code {
            102 => Some(CellType::Segment),
            203 => Some(CellType::Triangle),
            204 => Some(CellType::Quadrilateral),
            304 => Some(CellType::Tetrahedron),
            305 => Some(CellType::Pyramid),
            306 => Some(CellType::Wedge),
            308 => Some(CellType::Hexahedron),
            _ => None,
        }
    }

    /// Element letter used by the PFLOTRAN unstructured ASCII grid.
    ///
    /// Triangles and tetrahedra share `T`; the grid's dimension tells them apart.
    pub fn pflotran_letter(self) -> Option<char> {
        match self {
            CellType::Segment => None,
            CellType::Triangle | CellType::Tetrahedron => Some('T'),
            CellType::Quadrilateral => Some('Q'),
            CellType::Pyramid => Some('P'),
            CellType::Wedge => Some('W'),
            CellType::Hexahedron => Some('H'),
        }
    }

    /// Returns `true` for cells that bound a volume (triangles, quads).
    pub fn is_face(self) -> bool {
        self.dimension() == 2
    }

    /// Returns `true` for 3D cells.
    pub fn is_volume(self) -> bool {
        self.dimension() == 3
    }

    /// Human-readable name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            CellType::Segment => "segment",
            CellType::Triangle => "triangle",
            CellType::Quadrilateral => "quadrilateral",
            CellType::Tetrahedron => "tetrahedron",
            CellType::Pyramid => "pyramid",
            CellType::Wedge => "wedge",
            CellType::Hexahedron => "hexahedron",
        }
    }
}
