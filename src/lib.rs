#![cfg_attr(docsrs, feature(doc_cfg))]
//! # pflotran-mesh
//!
//! pflotran-mesh converts Salome DAT mesh dumps into grids for the PFLOTRAN
//! subsurface-flow simulator and writes the surface descriptors PFLOTRAN uses
//! for integral flux output.
//!
//! ## Features
//! - Salome DAT reader with strict count and id validation
//! - Right-hand-rule node ordering for tetrahedra, pyramids, wedges and hexahedra
//! - PFLOTRAN unstructured explicit ASCII grids and a binary grid container
//! - Zone/region assignment sidecars for multi-material meshes
//! - Integral-flux descriptors as centroid/normal pairs, vertex lists or cell-id pairs
//!
//! ## Usage
//! ```no_run
//! use pflotran_mesh::prelude::*;
//! use std::path::Path;
//!
//! let report = convert_file(
//!     Path::new("block.dat"),
//!     Path::new("block.mesh"),
//!     &ConvertOptions::default(),
//! )?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), pflotran_mesh::mesh_error::MeshError>(())
//! ```
//!
//! ## Diagnostics
//! Parse and I/O failures are returned as [`mesh_error::MeshError`]. Element
//! geometry problems are not errors: they are gathered per mesh in a
//! [`convert::ConversionReport`]. The crate logs through the `log` facade and
//! never installs a logger.

pub mod convert;
pub mod data;
pub mod geometry;
pub mod io;
pub mod mesh_error;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::convert::{
        ConversionJob, ConversionReport, ConvertOptions, DiagnosticKind, Dimension,
        ElementDiagnostic, ExportSummary, OutputFormat, Submesh, convert, convert_batch,
        convert_file, export_mesh_with_regions, prepare_grid, write_grid,
    };
    pub use crate::data::coordinates::Coordinates;
    pub use crate::data::mesh::{Element, Mesh};
    pub use crate::io::binary::{BinaryMesh, PflotranBinaryWriter, read_binary_mesh};
    pub use crate::io::integral_flux::{
        CellNumbering, FaceSelection, FluxOption, IntegralFluxOptions, SurfaceEncoding,
        export_integral_flux, write_integral_flux,
    };
    pub use crate::io::pflotran::{PflotranAsciiReader, PflotranAsciiWriter};
    pub use crate::io::salome_dat::SalomeDatReader;
    pub use crate::io::zone_assignment::ZoneAssignment;
    pub use crate::io::{MeshReader, MeshWriter, PflotranGrid, Region};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::orientation::{
        OrientationStatus, ReorientError, ReorientOptions, Reoriented, reorient,
    };
    pub use crate::topology::point::PointId;
}
