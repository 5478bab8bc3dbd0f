//! Salome DAT mesh dump reader.
//!
//! # Format
//! ```text
//! <n_vertices> <n_elements>
//! <id> <x> <y> <z>                      (n_vertices lines)
//! <id> <code> <node_1> ... <node_k>     (n_elements lines)
//! ```
//! `code` is `dimension * 100 + k`. Recognized codes are 102, 203, 204, 304,
//! 305, 306 and 308; any other code aborts the read. Blank lines are ignored
//! anywhere in the file.
//!
//! The reader keeps every recognized element; selecting the cells that are
//! written out is left to [`crate::convert`].

use crate::data::coordinates::Coordinates;
use crate::data::mesh::{Element, Mesh};
use crate::io::MeshReader;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::point::PointId;
use std::io::Read;

/// Reader for Salome `.dat` dumps.
#[derive(Debug, Default, Clone)]
pub struct SalomeDatReader;

impl SalomeDatReader {
    fn parse_count(line: usize, raw: Option<&str>, what: &str) -> Result<usize, MeshError> {
        let raw = raw.ok_or_else(|| MeshError::parse(line, format!("missing {what}")))?;
        raw.parse::<usize>()
            .map_err(|_| MeshError::parse(line, format!("invalid {what}: {raw}")))
    }

    fn parse_id(line: usize, raw: Option<&str>, what: &str) -> Result<PointId, MeshError> {
        let raw = raw.ok_or_else(|| MeshError::parse(line, format!("missing {what}")))?;
        let value = raw
            .parse::<u64>()
            .map_err(|_| MeshError::parse(line, format!("invalid {what}: {raw}")))?;
        PointId::new(value).map_err(|_| MeshError::parse(line, format!("{what} must be >= 1")))
    }

    fn parse_coord(line: usize, raw: Option<&str>) -> Result<f64, MeshError> {
        let raw = raw.ok_or_else(|| MeshError::parse(line, "missing coordinate"))?;
        raw.parse::<f64>()
            .map_err(|_| MeshError::parse(line, format!("invalid coordinate: {raw}")))
    }

    fn parse_vertex(line: usize, text: &str) -> Result<(PointId, [f64; 3]), MeshError> {
        let mut parts = text.split_whitespace();
        let id = Self::parse_id(line, parts.next(), "vertex id")?;
        let x = Self::parse_coord(line, parts.next())?;
        let y = Self::parse_coord(line, parts.next())?;
        let z = Self::parse_coord(line, parts.next())?;
        if parts.next().is_some() {
            return Err(MeshError::parse(line, "trailing data after vertex coordinates"));
        }
        Ok((id, [x, y, z]))
    }

    fn parse_element(line: usize, text: &str) -> Result<Element, MeshError> {
        let mut parts = text.split_whitespace();
        let id = Self::parse_id(line, parts.next(), "element id")?;
        let raw_code = parts
            .next()
            .ok_or_else(|| MeshError::parse(line, "missing topology code"))?;
        let code = raw_code
            .parse::<u32>()
            .map_err(|_| MeshError::parse(line, format!("invalid topology code: {raw_code}")))?;
        let cell_type = CellType::from_salome_code(code)
            .ok_or(MeshError::UnknownTopologyCode { element: id, code })?;
        let nodes = parts
            .map(|raw| Self::parse_id(line, Some(raw), "node id"))
            .collect::<Result<Vec<_>, _>>()?;
        if nodes.len() != cell_type.vertex_count() {
            return Err(MeshError::parse(
                line,
                format!(
                    "element {id} with code {code} lists {} nodes, expected {}",
                    nodes.len(),
                    cell_type.vertex_count()
                ),
            ));
        }
        Ok(Element::new(id, cell_type, nodes))
    }
}

impl MeshReader for SalomeDatReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<Mesh, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut records = contents
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text.trim()))
            .filter(|(_, text)| !text.is_empty());

        let (header_line, header) = records
            .next()
            .ok_or_else(|| MeshError::parse(1, "empty mesh dump"))?;
        let mut parts = header.split_whitespace();
        let n_vertices = Self::parse_count(header_line, parts.next(), "vertex count")?;
        let n_elements = Self::parse_count(header_line, parts.next(), "element count")?;
        if parts.next().is_some() {
            return Err(MeshError::parse(header_line, "trailing data after counts"));
        }

        let mut coordinates = Coordinates::new();
        let mut last_line = header_line;
        for read in 0..n_vertices {
            let (line, text) = records.next().ok_or_else(|| {
                MeshError::parse(
                    last_line,
                    format!("expected {n_vertices} vertices, found {read}"),
                )
            })?;
            let (id, xyz) = Self::parse_vertex(line, text)?;
            coordinates.try_insert(id, xyz)?;
            last_line = line;
        }

        let mut mesh = Mesh::new(coordinates);
        for read in 0..n_elements {
            let (line, text) = records.next().ok_or_else(|| {
                MeshError::parse(
                    last_line,
                    format!("expected {n_elements} elements, found {read}"),
                )
            })?;
            mesh.try_add_element(Self::parse_element(line, text)?)?;
            last_line = line;
        }

        if let Some((line, _)) = records.next() {
            return Err(MeshError::parse(
                line,
                format!("more records than the declared {n_vertices} vertices and {n_elements} elements"),
            ));
        }

        log::debug!(
            "Read Salome dump: {} vertices, {} elements",
            mesh.vertex_count(),
            mesh.element_count()
        );
        Ok(mesh)
    }
}
