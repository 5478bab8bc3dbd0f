//! Structured binary grid container.
//!
//! Holds the same datasets PFLOTRAN reads from its HDF5 grids: `Domain/Cells`
//! (one row per cell, vertex count first, then 1-based vertex numbers),
//! `Domain/Vertices` (one `[x, y, z]` row per vertex), and, when there is more
//! than one region, a `Regions` group. The container is encoded with
//! `bincode` behind a short magic tag and a format version.

use crate::io::{MeshWriter, PflotranGrid, Region};
use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Leading tag of every container.
pub const MAGIC: [u8; 8] = *b"PFLOMESH";
/// Current container layout version.
pub const FORMAT_VERSION: u32 = 1;

/// Decoded content of a binary grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryMesh {
    /// `Domain/Cells`: `[k, v_1, ..., v_k]` per cell.
    pub cells: Vec<Vec<u64>>,
    /// `Domain/Vertices`.
    pub vertices: Vec<[f64; 3]>,
    /// `Regions`; empty for single-region grids.
    pub regions: Vec<Region>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    magic: [u8; 8],
    version: u32,
    mesh: BinaryMesh,
}

impl BinaryMesh {
    /// Flattens a grid into datasets. Regions are kept only when two or more
    /// are present.
    pub fn from_grid(grid: &PflotranGrid) -> Self {
        let cells = grid
            .cells
            .iter()
            .map(|cell| {
                std::iter::once(cell.nodes.len() as u64)
                    .chain(cell.nodes.iter().map(|n| n.get()))
                    .collect()
            })
            .collect();
        let vertices = grid.coordinates.iter().map(|(_, xyz)| xyz).collect();
        let regions = if grid.regions.len() > 1 {
            grid.regions.clone()
        } else {
            Vec::new()
        };
        Self {
            cells,
            vertices,
            regions,
        }
    }
}

/// Writer for the binary container.
#[derive(Debug, Default, Clone)]
pub struct PflotranBinaryWriter;

impl MeshWriter for PflotranBinaryWriter {
    fn write<W: Write>(&self, writer: W, grid: &PflotranGrid) -> Result<(), MeshError> {
        let envelope = Envelope {
            magic: MAGIC,
            version: FORMAT_VERSION,
            mesh: BinaryMesh::from_grid(grid),
        };
        bincode::serialize_into(writer, &envelope)?;
        Ok(())
    }
}

/// Decodes a container written by [`PflotranBinaryWriter`].
///
/// # Errors
/// [`MeshError::Binary`] for undecodable input, a foreign magic tag, or an
/// unknown version.
pub fn read_binary_mesh<R: Read>(reader: R) -> Result<BinaryMesh, MeshError> {
    let envelope: Envelope = bincode::deserialize_from(reader)?;
    if envelope.magic != MAGIC {
        return Err(MeshError::Binary("not a binary grid container".into()));
    }
    if envelope.version != FORMAT_VERSION {
        return Err(MeshError::Binary(format!(
            "unsupported container version {}",
            envelope.version
        )));
    }
    Ok(envelope.mesh)
}
