//! Integral-flux surface descriptors.
//!
//! A descriptor names a set of faces of a volumetric mesh through which
//! PFLOTRAN integrates fluxes:
//!
//! ```text
//! [INVERT_DIRECTION]
//! [FLUXES_OPTION POSITIVE_FLUXES_ONLY | FLUXES_OPTION ABSOLUTE_FLUXES]
//! COORDINATES_AND_DIRECTIONS | VERTICES | CELL_IDS
//!   <one line per face>
//! /
//! ```
//! The terminator is not followed by a newline.

use crate::data::mesh::{Element, Mesh};
use crate::geometry::metrics::face_normal;
use crate::geometry::vector::{Vec3, centroid, dot, vector};
use crate::io::write_atomically;
use crate::mesh_error::MeshError;
use crate::topology::point::PointId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sign handling requested from PFLOTRAN.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxOption {
    #[default]
    Signed,
    PositiveOnly,
    Absolute,
}

impl FluxOption {
    fn header(self) -> Option<&'static str> {
        match self {
            FluxOption::Signed => None,
            FluxOption::PositiveOnly => Some("FLUXES_OPTION POSITIVE_FLUXES_ONLY"),
            FluxOption::Absolute => Some("FLUXES_OPTION ABSOLUTE_FLUXES"),
        }
    }
}

/// How each face is described.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEncoding {
    /// Face centroid followed by its unit normal.
    #[default]
    CoordinatesAndDirections,
    /// Node ids of the face.
    Vertices,
    /// The two volume cells sharing the face.
    CellIds,
}

impl SurfaceEncoding {
    pub fn keyword(self) -> &'static str {
        match self {
            SurfaceEncoding::CoordinatesAndDirections => "COORDINATES_AND_DIRECTIONS",
            SurfaceEncoding::Vertices => "VERTICES",
            SurfaceEncoding::CellIds => "CELL_IDS",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegralFluxOptions {
    pub encoding: SurfaceEncoding,
    pub flux_option: FluxOption,
    pub invert_direction: bool,
}

/// A named group of face elements of the parent mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceSelection {
    pub name: String,
    pub faces: Vec<PointId>,
}

impl FaceSelection {
    pub fn new(name: impl Into<String>, faces: Vec<PointId>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }
}

/// PFLOTRAN cell ids (1-based positions in the written grid) keyed by
/// element id. CELL_IDS descriptors refer to cells through this numbering, so
/// it must describe the grid that was actually written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellNumbering {
    ids: HashMap<PointId, u64>,
}

impl CellNumbering {
    /// Numbers `cells` 1, 2, ... in the order given.
    pub fn new(cells: impl IntoIterator<Item = PointId>) -> Self {
        let ids = cells
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i as u64 + 1))
            .collect();
        Self { ids }
    }

    /// Every volume element of `mesh` in element order, i.e. the grid a 3D
    /// conversion writes when no cell is left out.
    pub fn volume_cells(mesh: &Mesh) -> Self {
        Self::new(mesh.volume_elements().map(|e| e.id))
    }

    pub fn get(&self, element: PointId) -> Option<u64> {
        self.ids.get(&element).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Numbered volume cells and the cells around each vertex.
struct VolumeAdjacency<'a> {
    cells: Vec<(&'a Element, u64)>,
    around: HashMap<PointId, Vec<usize>>,
}

impl<'a> VolumeAdjacency<'a> {
    /// Volume elements without a number are not part of the grid and are
    /// ignored.
    fn new(mesh: &'a Mesh, numbering: &CellNumbering) -> Self {
        let cells: Vec<(&Element, u64)> = mesh
            .volume_elements()
            .filter_map(|e| numbering.get(e.id).map(|n| (e, n)))
            .collect();
        let mut around: HashMap<PointId, Vec<usize>> = HashMap::new();
        for (i, (cell, _)) in cells.iter().enumerate() {
            for &node in &cell.nodes {
                around.entry(node).or_default().push(i);
            }
        }
        Self { cells, around }
    }

    /// Positions of the volume cells that contain every node of `face`.
    fn sharing(&self, face: &Element) -> Vec<usize> {
        let Some((first, rest)) = face.nodes.split_first() else {
            return Vec::new();
        };
        self.around
            .get(first)
            .map(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&i| rest.iter().all(|n| self.cells[i].0.nodes.contains(n)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn resolve_faces<'a>(
    mesh: &'a Mesh,
    selection: &FaceSelection,
) -> Result<Vec<&'a Element>, MeshError> {
    selection
        .faces
        .iter()
        .map(|&id| {
            let face = mesh.element(id).ok_or(MeshError::MissingElement(id))?;
            if !face.cell_type.is_face() {
                return Err(MeshError::NotAFaceGroup {
                    group: selection.name.clone(),
                    element: id,
                    kind: face.cell_type.name(),
                });
            }
            Ok(face)
        })
        .collect()
}

fn unit_face_normal(mesh: &Mesh, face: &Element) -> Result<(Vec3, Vec<Vec3>), MeshError> {
    let points = mesh.element_vertices(face)?;
    let normal = face_normal(&points).map_err(|_| {
        MeshError::InvalidGeometry(format!("face {} has no defined normal", face.id))
    })?;
    Ok((normal, points))
}

/// Writes the descriptor of one face selection.
///
/// Every face is validated before anything is written.
///
/// # Errors
/// - [`MeshError::MissingElement`] for ids not in `mesh`.
/// - [`MeshError::NotAFaceGroup`] when an id is not a triangle or quad.
/// - [`MeshError::FaceAdjacency`] (CELL_IDS only) when a face is not shared by
///   exactly two volume cells of `cells`.
///
/// `cells` is only consulted for CELL_IDS.
pub fn write_integral_flux<W: Write>(
    mut writer: W,
    mesh: &Mesh,
    cells: &CellNumbering,
    selection: &FaceSelection,
    options: &IntegralFluxOptions,
) -> Result<(), MeshError> {
    let faces = resolve_faces(mesh, selection)?;

    if options.invert_direction {
        writeln!(writer, "INVERT_DIRECTION")?;
    }
    if let Some(header) = options.flux_option.header() {
        writeln!(writer, "{header}")?;
    }
    writeln!(writer, "{}", options.encoding.keyword())?;

    match options.encoding {
        SurfaceEncoding::CoordinatesAndDirections => {
            for face in &faces {
                let (n, points) = unit_face_normal(mesh, face)?;
                let c = centroid(&points);
                writeln!(
                    writer,
                    "  {} {} {} {} {} {}",
                    c[0], c[1], c[2], n[0], n[1], n[2]
                )?;
            }
        }
        SurfaceEncoding::Vertices => {
            for face in &faces {
                write!(writer, " ")?;
                for node in &face.nodes {
                    write!(writer, " {node}")?;
                }
                writeln!(writer)?;
            }
        }
        SurfaceEncoding::CellIds => {
            let adjacency = VolumeAdjacency::new(mesh, cells);
            for face in &faces {
                let shared = adjacency.sharing(face);
                let &[first, second] = shared.as_slice() else {
                    return Err(MeshError::FaceAdjacency {
                        face: face.id,
                        cells: shared.len(),
                    });
                };
                let (normal, points) = unit_face_normal(mesh, face)?;
                let (first, second) = (adjacency.cells[first], adjacency.cells[second]);
                let far = centroid(&mesh.element_vertices(second.0)?);
                let (from, to) = if dot(normal, vector(points[0], far)) < 0.0 {
                    (second.1, first.1)
                } else {
                    (first.1, second.1)
                };
                writeln!(writer, "  {from} {to}")?;
            }
        }
    }
    write!(writer, "/")?;
    Ok(())
}

/// Output path for a single descriptor: `.txt` is appended unless the path
/// already ends in it.
pub fn descriptor_path(dest: &Path) -> PathBuf {
    if dest.extension().is_some_and(|ext| ext == "txt") {
        return dest.to_path_buf();
    }
    let mut raw = dest.as_os_str().to_owned();
    raw.push(".txt");
    PathBuf::from(raw)
}

/// Writes one descriptor file per selection and returns the written paths.
///
/// With a single selection `dest` is the output file (see
/// [`descriptor_path`]); with several it is an existing directory receiving
/// `<name>.txt` per selection.
///
/// # Errors
/// [`MeshError::EmptySelection`] when `selections` is empty,
/// [`MeshError::DuplicateGroup`] when two selections share a name, plus
/// anything [`write_integral_flux`] or the file system reports. Files written
/// before a failing selection are kept.
pub fn export_integral_flux(
    dest: &Path,
    mesh: &Mesh,
    cells: &CellNumbering,
    selections: &[FaceSelection],
    options: &IntegralFluxOptions,
) -> Result<Vec<PathBuf>, MeshError> {
    let paths: Vec<PathBuf> = match selections {
        [] => {
            return Err(MeshError::EmptySelection(
                "no face group selected for integral flux".into(),
            ));
        }
        [_] => vec![descriptor_path(dest)],
        many => {
            let mut seen = HashSet::new();
            if let Some(dup) = many.iter().find(|s| !seen.insert(s.name.as_str())) {
                return Err(MeshError::DuplicateGroup(dup.name.clone()));
            }
            many.iter()
                .map(|s| dest.join(format!("{}.txt", s.name)))
                .collect()
        }
    };
    for (selection, path) in selections.iter().zip(&paths) {
        log::info!("Create surface integral file: {}", path.display());
        write_atomically(path, |w| write_integral_flux(w, mesh, cells, selection, options))?;
    }
    Ok(paths)
}
