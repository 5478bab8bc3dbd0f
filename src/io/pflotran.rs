//! PFLOTRAN unstructured explicit ASCII grid.
//!
//! ```text
//! <n_cells> <n_vertices>
//! <letter> <v_1> ... <v_k>     (one line per cell, k from the letter)
//! <x> <y> <z>                  (one line per vertex, vertex i is line i)
//! ```
//! Letters: `T` (triangle or tetrahedron), `Q`, `P`, `W`, `H`. Floats use the
//! shortest representation that parses back to the same `f64`.

use crate::data::coordinates::Coordinates;
use crate::data::mesh::Element;
use crate::io::{MeshWriter, PflotranGrid};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::point::PointId;
use std::io::{Read, Write};

/// Writer for the ASCII grid. Region groups are not representable and are
/// ignored.
#[derive(Debug, Default, Clone)]
pub struct PflotranAsciiWriter;

impl MeshWriter for PflotranAsciiWriter {
    fn write<W: Write>(&self, mut writer: W, grid: &PflotranGrid) -> Result<(), MeshError> {
        writeln!(writer, "{} {}", grid.cells.len(), grid.coordinates.len())?;
        for cell in &grid.cells {
            let letter = cell.cell_type.pflotran_letter().ok_or_else(|| {
                MeshError::InvalidGeometry(format!(
                    "element {} is a {}, which has no grid letter",
                    cell.id,
                    cell.cell_type.name()
                ))
            })?;
            write!(writer, "{letter}")?;
            for node in &cell.nodes {
                write!(writer, " {node}")?;
            }
            writeln!(writer)?;
        }
        for (_, [x, y, z]) in grid.coordinates.iter() {
            writeln!(writer, "{x} {y} {z}")?;
        }
        Ok(())
    }
}

/// Reader for grids written by [`PflotranAsciiWriter`].
///
/// Cells and vertices get the ids PFLOTRAN gives them: their 1-based line
/// position within their block.
#[derive(Debug, Default, Clone)]
pub struct PflotranAsciiReader;

impl PflotranAsciiReader {
    fn cell_type(letter: &str, nodes: usize) -> Option<CellType> {
        match (letter, nodes) {
            ("T", 3) => Some(CellType::Triangle),
            ("T", 4) => Some(CellType::Tetrahedron),
            ("Q", 4) => Some(CellType::Quadrilateral),
            ("P", 5) => Some(CellType::Pyramid),
            ("W", 6) => Some(CellType::Wedge),
            ("H", 8) => Some(CellType::Hexahedron),
            _ => None,
        }
    }

    fn parse_usize(line: usize, raw: Option<&str>, what: &str) -> Result<usize, MeshError> {
        let raw = raw.ok_or_else(|| MeshError::parse(line, format!("missing {what}")))?;
        raw.parse()
            .map_err(|_| MeshError::parse(line, format!("invalid {what}: {raw}")))
    }

    fn position_id(line: usize, position: usize) -> Result<PointId, MeshError> {
        PointId::new(position as u64 + 1).map_err(|_| MeshError::parse(line, "id overflow"))
    }

    pub fn read<R: Read>(&self, mut reader: R) -> Result<PflotranGrid, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut records = contents
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text.trim()))
            .filter(|(_, text)| !text.is_empty());

        let (header_line, header) = records
            .next()
            .ok_or_else(|| MeshError::parse(1, "empty grid"))?;
        let mut parts = header.split_whitespace();
        let n_cells = Self::parse_usize(header_line, parts.next(), "cell count")?;
        let n_vertices = Self::parse_usize(header_line, parts.next(), "vertex count")?;

        let mut cells = Vec::with_capacity(n_cells);
        for position in 0..n_cells {
            let (line, text) = records
                .next()
                .ok_or_else(|| MeshError::parse(header_line, "unexpected end of cell block"))?;
            let mut parts = text.split_whitespace();
            let letter = parts
                .next()
                .ok_or_else(|| MeshError::parse(line, "missing cell letter"))?;
            let nodes = parts
                .map(|raw| {
                    raw.parse::<u64>()
                        .ok()
                        .and_then(|v| PointId::new(v).ok())
                        .ok_or_else(|| MeshError::parse(line, format!("invalid vertex id: {raw}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let cell_type = Self::cell_type(letter, nodes.len()).ok_or_else(|| {
                MeshError::parse(
                    line,
                    format!("`{letter}` with {} vertices is not a grid cell", nodes.len()),
                )
            })?;
            cells.push(Element::new(Self::position_id(line, position)?, cell_type, nodes));
        }

        let mut coordinates = Coordinates::new();
        for position in 0..n_vertices {
            let (line, text) = records
                .next()
                .ok_or_else(|| MeshError::parse(header_line, "unexpected end of vertex block"))?;
            let xyz = text
                .split_whitespace()
                .map(|raw| {
                    raw.parse::<f64>()
                        .map_err(|_| MeshError::parse(line, format!("invalid coordinate: {raw}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let &[x, y, z] = &xyz[..] else {
                return Err(MeshError::parse(line, "expected 3 coordinates"));
            };
            coordinates.try_insert(Self::position_id(line, position)?, [x, y, z])?;
        }

        if let Some((line, _)) = records.next() {
            return Err(MeshError::parse(line, "trailing records after vertex block"));
        }
        Ok(PflotranGrid {
            coordinates,
            cells,
            regions: Vec::new(),
        })
    }
}
