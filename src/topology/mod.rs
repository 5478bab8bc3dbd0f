//! Element topology: ids, cell families, and the reorientation engine.

pub mod cell_type;
pub mod orientation;
pub mod point;

pub use cell_type::CellType;
pub use orientation::{OrientationStatus, ReorientError, ReorientOptions, Reoriented, reorient};
pub use point::PointId;
