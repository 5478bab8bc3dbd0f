//! Mesh I/O: Salome DAT input, PFLOTRAN grid output, and sidecar files.
//!
//! Readers produce a [`Mesh`]; writers consume a [`PflotranGrid`], i.e. the
//! filtered and reoriented cells that are about to be handed to PFLOTRAN.
//! Files on disk are written through [`write_atomically`], so a failed
//! conversion never leaves a complete-looking output behind.

pub mod binary;
pub mod integral_flux;
pub mod pflotran;
pub mod salome_dat;
pub mod zone_assignment;

use crate::data::coordinates::Coordinates;
use crate::data::mesh::{Element, Mesh};
use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// A named group of cells, numbered like PFLOTRAN numbers them (1-based
/// position in [`PflotranGrid::cells`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub index: u32,
    pub cells: Vec<u64>,
}

/// Cells and vertices ready to be written, in output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PflotranGrid {
    pub coordinates: Coordinates,
    /// Retained cells; the node order is final.
    pub cells: Vec<Element>,
    /// Region groups; only emitted by writers when there are two or more.
    pub regions: Vec<Region>,
}

/// Trait for readers that produce a source mesh.
pub trait MeshReader {
    fn read<R: Read>(&self, reader: R) -> Result<Mesh, MeshError>;
}

/// Trait for writers that serialize a prepared grid.
pub trait MeshWriter {
    fn write<W: Write>(&self, writer: W, grid: &PflotranGrid) -> Result<(), MeshError>;
}

/// Writes `path` through a temporary file in the same directory.
///
/// The temporary file is persisted over `path` only after `body` returned
/// `Ok` and the buffer was flushed; on any error it is removed.
pub fn write_atomically<P, F>(path: P, body: F) -> Result<(), MeshError>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> Result<(), MeshError>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        body(&mut out)?;
        out.flush()?;
    }
    tmp.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_persists_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_atomically(&path, |w| {
            writeln!(w, "hello")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn atomic_write_leaves_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let err = write_atomically(&path, |w| {
            writeln!(w, "partial")?;
            Err(MeshError::InvalidGeometry("boom".into()))
        })
        .unwrap_err();
        assert_eq!(err, MeshError::InvalidGeometry("boom".into()));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn atomic_write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        let err = write_atomically(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(err, MeshError::Io(_)), "{err:?}");
    }
}
