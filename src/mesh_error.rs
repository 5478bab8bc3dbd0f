//! MeshError: unified error type for pflotran-mesh public APIs
//!
//! Every fallible operation in the crate (parsing, validation, writing,
//! integral flux export) reports through this enum. Per-element geometry
//! problems are *not* errors at this level; they are collected as
//! [`ElementDiagnostic`](crate::convert::ElementDiagnostic)s by the pipeline.

use crate::topology::point::PointId;
use thiserror::Error;

/// Unified error type for mesh conversion operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Attempted to construct a PointId with a zero value (invalid).
    #[error("PointId must be non-zero (ids are 1-based)")]
    InvalidPointId,
    /// The source dump could not be parsed.
    #[error("Mesh parse error at line {line}: {message}")]
    MeshIoParse { line: usize, message: String },
    /// A topology code that belongs to no recognized element family.
    #[error("Unknown topology code `{code}` for element {element}")]
    UnknownTopologyCode { element: PointId, code: u32 },
    /// Two vertices share the same id.
    #[error("Duplicate vertex id {0}")]
    DuplicateVertex(PointId),
    /// Two elements share the same id.
    #[error("Duplicate element id {0}")]
    DuplicateElement(PointId),
    /// An element references a vertex that is not in the vertex table.
    #[error("Element {element} references missing vertex {vertex}")]
    MissingVertex { element: PointId, vertex: PointId },
    /// An element id was looked up but does not exist.
    #[error("Missing element {0}")]
    MissingElement(PointId),
    /// Geometry that cannot be evaluated (zero-length normal, NaN, ...).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A face selection contains something other than triangles/quads.
    #[error("Selection `{group}` is not a face group: element {element} is a {kind}")]
    NotAFaceGroup {
        group: String,
        element: PointId,
        kind: &'static str,
    },
    /// A face used for CELL_IDS is not shared by exactly two volume cells.
    #[error("Face {face} is adjacent to {cells} volume cell(s), expected 2")]
    FaceAdjacency { face: PointId, cells: usize },
    /// A batch export was asked to produce nothing.
    #[error("Nothing to export: {0}")]
    EmptySelection(String),
    /// Two face groups of one export would write the same file.
    #[error("Face group name {0:?} is used more than once")]
    DuplicateGroup(String),
    /// Binary container encode/decode failure.
    #[error("Binary container error: {0}")]
    Binary(String),
    /// Underlying file-system failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl MeshError {
    /// Shorthand for a parse error located at a 1-based source line.
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        MeshError::MeshIoParse {
            line,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        MeshError::Io(err.to_string())
    }
}

impl From<tempfile::PersistError> for MeshError {
    fn from(err: tempfile::PersistError) -> Self {
        MeshError::Io(err.error.to_string())
    }
}

impl From<bincode::Error> for MeshError {
    fn from(err: bincode::Error) -> Self {
        MeshError::Binary(err.to_string())
    }
}
