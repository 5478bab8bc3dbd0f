//! Salome DAT to PFLOTRAN conversion pipeline.
//!
//! parse → filter by dimension → reorient → buffer → write. The element count
//! in the grid header is only known after filtering and reorientation, so the
//! whole grid is assembled in memory before the first byte is written.
//!
//! Per-element geometry problems never abort a conversion. They are collected
//! as [`ElementDiagnostic`]s in the returned [`ConversionReport`]:
//! unsupported topologies are written unchanged, elements without a valid
//! ordering are left out.

use crate::data::mesh::{Element, Mesh};
use crate::io::binary::PflotranBinaryWriter;
use crate::io::integral_flux::CellNumbering;
use crate::io::pflotran::PflotranAsciiWriter;
use crate::io::salome_dat::SalomeDatReader;
use crate::io::zone_assignment::ZoneAssignment;
use crate::io::{MeshReader, MeshWriter, PflotranGrid, Region, write_atomically};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::CellType;
use crate::topology::orientation::{OrientationStatus, ReorientError, ReorientOptions, reorient};
use crate::topology::point::PointId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Which cells of the dump end up in the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    /// Tetrahedra, pyramids, wedges and hexahedra.
    #[default]
    Three,
    /// Triangles and quadrilaterals.
    Two,
    /// 3D if the dump has any volume element, 2D otherwise.
    Auto,
}

impl Dimension {
    /// The topological dimension of the cells kept for `mesh`.
    pub fn resolve(self, mesh: &Mesh) -> u8 {
        match self {
            Dimension::Three => 3,
            Dimension::Two => 2,
            Dimension::Auto if mesh.max_dimension() >= 3 => 3,
            Dimension::Auto => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Unstructured explicit ASCII grid.
    #[default]
    Ascii,
    /// Binary container with cell/vertex datasets and region groups.
    Binary,
}

impl OutputFormat {
    /// File extension used by [`export_mesh_with_regions`].
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Ascii => "mesh",
            OutputFormat::Binary => "h5bin",
        }
    }
}

/// Conversion settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub dimension: Dimension,
    /// Apply the right-hand-rule ordering to every kept cell.
    pub reorient: bool,
    pub reorient_options: ReorientOptions,
    pub format: OutputFormat,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dimension: Dimension::Three,
            reorient: true,
            reorient_options: ReorientOptions::default(),
            format: OutputFormat::Ascii,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    /// No ordering rule; the element was written as read.
    Unsupported,
    /// No valid ordering; the element was left out.
    Excluded(ReorientError),
}

/// A per-element finding of the reorientation step.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementDiagnostic {
    pub element: PointId,
    pub cell_type: CellType,
    pub kind: DiagnosticKind,
}

impl fmt::Display for ElementDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Unsupported => write!(
                f,
                "element {} ({}): unsupported topology, written unchanged",
                self.element,
                self.cell_type.name()
            ),
            DiagnosticKind::Excluded(err) => write!(
                f,
                "element {} ({}): {err}, left out of the grid",
                self.element,
                self.cell_type.name()
            ),
        }
    }
}

/// Outcome of converting one mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionReport {
    pub mesh_name: String,
    /// Dimension of the written cells (2 or 3).
    pub dimension: u8,
    pub vertices: usize,
    pub elements_read: usize,
    pub elements_written: usize,
    /// Elements outside the selected dimension.
    pub skipped: usize,
    /// Cells whose node order was changed.
    pub reordered: usize,
    /// Vertex ids had gaps and were renumbered to `1..=n`.
    pub renumbered_vertices: bool,
    pub diagnostics: Vec<ElementDiagnostic>,
    /// Element ids of the written cells, in grid order.
    pub written_cells: Vec<PointId>,
}

impl ConversionReport {
    /// `true` when any element was reported by the reorientation step.
    pub fn has_flagged_elements(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Elements dropped because no valid ordering exists.
    pub fn excluded(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::Excluded(_)))
            .count()
    }

    /// PFLOTRAN cell ids of the written grid, for CELL_IDS descriptors.
    pub fn cell_numbering(&self) -> CellNumbering {
        CellNumbering::new(self.written_cells.iter().copied())
    }
}

/// Filters and reorients `mesh` into a writable grid.
pub fn prepare_grid(
    mesh: &Mesh,
    name: &str,
    options: &ConvertOptions,
) -> (PflotranGrid, ConversionReport) {
    let dimension = options.dimension.resolve(mesh);
    let mut report = ConversionReport {
        mesh_name: name.to_string(),
        dimension,
        vertices: mesh.vertex_count(),
        elements_read: mesh.element_count(),
        ..Default::default()
    };

    let mut cells = Vec::with_capacity(mesh.element_count());
    for element in mesh.elements() {
        if element.cell_type.dimension() != dimension {
            log::debug!(
                "{name}: skipping {} {} outside the {dimension}D cell set",
                element.cell_type.name(),
                element.id
            );
            report.skipped += 1;
            continue;
        }
        if !options.reorient {
            cells.push(element.clone());
            continue;
        }
        match reorient(
            element.cell_type,
            &element.nodes,
            mesh.coordinates(),
            &options.reorient_options,
        ) {
            Ok(oriented) => {
                match oriented.status {
                    OrientationStatus::Reordered => report.reordered += 1,
                    OrientationStatus::Unsupported => {
                        flag(&mut report, element, DiagnosticKind::Unsupported)
                    }
                    OrientationStatus::AlreadyOriented => {}
                }
                cells.push(Element::new(element.id, element.cell_type, oriented.nodes));
            }
            Err(err) => flag(&mut report, element, DiagnosticKind::Excluded(err)),
        }
    }

    let mut coordinates = mesh.coordinates().clone();
    if let Some(dense) = coordinates.renumbering() {
        log::warn!("{name}: vertex ids are not contiguous, renumbering to 1..={}", dense.len());
        coordinates = coordinates.iter().map(|(id, xyz)| (dense[&id], xyz)).collect();
        for cell in &mut cells {
            for node in &mut cell.nodes {
                *node = dense[&*node];
            }
        }
        report.renumbered_vertices = true;
    }

    report.elements_written = cells.len();
    report.written_cells = cells.iter().map(|cell| cell.id).collect();
    let grid = PflotranGrid {
        coordinates,
        cells,
        regions: Vec::new(),
    };
    (grid, report)
}

fn flag(report: &mut ConversionReport, element: &Element, kind: DiagnosticKind) {
    let diagnostic = ElementDiagnostic {
        element: element.id,
        cell_type: element.cell_type,
        kind,
    };
    log::warn!("{}: {diagnostic}", report.mesh_name);
    report.diagnostics.push(diagnostic);
}

/// Serializes `grid` in `format`.
pub fn write_grid<W: Write>(
    writer: W,
    grid: &PflotranGrid,
    format: OutputFormat,
) -> Result<(), MeshError> {
    match format {
        OutputFormat::Ascii => PflotranAsciiWriter.write(writer, grid),
        OutputFormat::Binary => PflotranBinaryWriter.write(writer, grid),
    }
}

/// Converts a DAT dump read from `input` and writes the grid to `output`.
///
/// Nothing is written when parsing fails.
pub fn convert<R: Read, W: Write>(
    input: R,
    output: W,
    name: &str,
    options: &ConvertOptions,
) -> Result<ConversionReport, MeshError> {
    let mesh = SalomeDatReader.read(input)?;
    let (grid, report) = prepare_grid(&mesh, name, options);
    write_grid(output, &grid, options.format)?;
    log_report(&report);
    Ok(report)
}

fn log_report(report: &ConversionReport) {
    log::info!(
        "{}: wrote {} of {} elements, {} vertices ({} skipped, {} reordered, {} flagged)",
        report.mesh_name,
        report.elements_written,
        report.elements_read,
        report.vertices,
        report.skipped,
        report.reordered,
        report.diagnostics.len()
    );
}

fn read_dump(path: &Path) -> Result<Mesh, MeshError> {
    let file = File::open(path)?;
    SalomeDatReader.read(BufReader::new(file))
}

fn mesh_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Converts the dump at `input` into `output`.
///
/// The output file only appears once it is complete; on error no file is
/// created and an existing `output` is left untouched.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, MeshError> {
    let mesh = read_dump(input)?;
    let (grid, report) = prepare_grid(&mesh, &mesh_name(input), options);
    write_atomically(output, |w| write_grid(w, &grid, options.format))?;
    log::info!("Wrote {}", output.display());
    log_report(&report);
    Ok(report)
}

/// One input/output pair of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Converts each job in turn, stopping at the first failing mesh.
///
/// Outputs of jobs that completed before the failure are kept.
pub fn convert_batch(
    jobs: &[ConversionJob],
    options: &ConvertOptions,
) -> Result<Vec<ConversionReport>, MeshError> {
    jobs.iter()
        .map(|job| convert_file(&job.input, &job.output, options))
        .collect()
}

/// A material submesh dumped to its own DAT file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submesh {
    pub name: String,
    pub dump: PathBuf,
}

/// Files produced by [`export_mesh_with_regions`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportSummary {
    pub report: ConversionReport,
    pub mesh_path: PathBuf,
    pub assignment_path: PathBuf,
}

/// ASCII grids carry no regions, so any submesh is lost in them.
fn regions_need_binary(format: OutputFormat, submeshes: usize) -> bool {
    format == OutputFormat::Ascii && submeshes > 0
}

/// Converts a main mesh plus its material submeshes.
///
/// Writes `<dest_dir>/<name>.mesh` (or `.h5bin`) and the assignment sidecar:
/// `<name>_zone.assignment` without submeshes, `<name>_region.assignment`
/// with one line per submesh otherwise. Binary output also groups the grid
/// cells by submesh, matching cells by element id.
pub fn export_mesh_with_regions(
    main_dump: &Path,
    submeshes: &[Submesh],
    dest_dir: &Path,
    name: &str,
    options: &ConvertOptions,
) -> Result<ExportSummary, MeshError> {
    let mesh = read_dump(main_dump)?;
    let (mut grid, report) = prepare_grid(&mesh, name, options);

    let zones = if submeshes.is_empty() {
        ZoneAssignment::single(name)
    } else {
        ZoneAssignment::from_submeshes(submeshes.iter().map(|s| s.name.as_str()))
    };

    if regions_need_binary(options.format, submeshes.len()) {
        log::warn!(
            "{name}: ASCII output cannot hold {} region(s); PFLOTRAN needs binary output to use them",
            submeshes.len()
        );
    }
    if options.format == OutputFormat::Binary {
        let position: HashMap<PointId, u64> = grid
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.id, i as u64 + 1))
            .collect();
        for (submesh, (_, index)) in submeshes.iter().zip(zones.entries()) {
            let part = read_dump(&submesh.dump)?;
            let cells = part
                .elements()
                .iter()
                .filter_map(|e| position.get(&e.id).copied())
                .collect();
            grid.regions.push(Region {
                name: submesh.name.clone(),
                index: *index,
                cells,
            });
        }
    }

    let mesh_path = dest_dir.join(format!("{name}.{}", options.format.extension()));
    write_atomically(&mesh_path, |w| write_grid(w, &grid, options.format))?;
    log::info!("Wrote {}", mesh_path.display());

    let assignment_path = dest_dir.join(ZoneAssignment::file_name(name, !submeshes.is_empty()));
    write_atomically(&assignment_path, |w| zones.write(w))?;
    log::info!("Wrote {}", assignment_path.display());
    log_report(&report);

    Ok(ExportSummary {
        report,
        mesh_path,
        assignment_path,
    })
}
