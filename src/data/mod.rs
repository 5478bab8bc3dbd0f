//! Mesh data: vertex coordinates and the element list.

pub mod coordinates;
pub mod mesh;
