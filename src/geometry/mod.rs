//! Geometry utilities for the converter.
//!
//! [`vector`] holds the primitive kernel (difference, cross, dot, coplanarity),
//! [`metrics`] builds signed volumes and face normals on top of it.

pub mod metrics;
pub mod vector;
