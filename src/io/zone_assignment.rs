//! Zone/region assignment sidecar.
//!
//! One line per material source, `<file name> <region index>`, indices
//! starting at 1 in the order the sources were added.

use crate::mesh_error::MeshError;
use std::io::Write;

/// An ordered list of `(file name, region index)` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneAssignment {
    entries: Vec<(String, u32)>,
}

impl ZoneAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single-material case: the whole mesh is region 1.
    pub fn single(mesh_name: &str) -> Self {
        let mut zones = Self::new();
        zones.push(format!("{mesh_name}.dat"));
        zones
    }

    /// One region per submesh, numbered in order.
    pub fn from_submeshes<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut zones = Self::new();
        for name in names {
            zones.push(format!("{name}.dat"));
        }
        zones
    }

    /// Appends a source and returns the index it was given.
    pub fn push(&mut self, file_name: impl Into<String>) -> u32 {
        let index = self.entries.len() as u32 + 1;
        self.entries.push((file_name.into(), index));
        index
    }

    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sidecar file name for a mesh: `<mesh>_zone.assignment` for a single
    /// material, `<mesh>_region.assignment` when built from submeshes.
    pub fn file_name(mesh_name: &str, from_submeshes: bool) -> String {
        if from_submeshes {
            format!("{mesh_name}_region.assignment")
        } else {
            format!("{mesh_name}_zone.assignment")
        }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), MeshError> {
        for (name, index) in &self.entries {
            writeln!(writer, "{name} {index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(zones: &ZoneAssignment) -> String {
        let mut out = Vec::new();
        zones.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn single_material() {
        assert_eq!(render(&ZoneAssignment::single("block")), "block.dat 1\n");
        assert_eq!(ZoneAssignment::file_name("block", false), "block_zone.assignment");
    }

    #[test]
    fn submeshes_are_numbered_in_order() {
        let zones = ZoneAssignment::from_submeshes(["sand", "clay", "rock"]);
        assert_eq!(render(&zones), "sand.dat 1\nclay.dat 2\nrock.dat 3\n");
        assert_eq!(ZoneAssignment::file_name("site", true), "site_region.assignment");
    }

    #[test]
    fn push_returns_next_index() {
        let mut zones = ZoneAssignment::new();
        assert!(zones.is_empty());
        assert_eq!(zones.push("a.dat"), 1);
        assert_eq!(zones.push("b.dat"), 2);
        assert_eq!(zones.len(), 2);
    }
}
