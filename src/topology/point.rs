//! `PointId`: a strong, zero-cost handle for vertices and elements
//!
//! Salome numbers both vertices and elements from 1, and PFLOTRAN refers to
//! vertices by the same 1-based ids. `PointId` wraps a `NonZeroU64` so that
//! 0 can never sneak in as a valid id.

use crate::mesh_error::MeshError;
use std::{fmt, num::NonZeroU64};

/// A 1-based identifier for a vertex or an element.
///
/// This type is `repr(transparent)` over `NonZeroU64`, so `Option<PointId>`
/// has the same size as `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct PointId(NonZeroU64);

impl PointId {
    /// Creates a new `PointId` from a raw `u64` value.
    ///
    /// # Errors
    /// Returns [`MeshError::InvalidPointId`] if `raw == 0`.
    ///
    /// ```rust
    /// # use pflotran_mesh::topology::point::PointId;
    /// let p = PointId::new(1)?;
    /// assert_eq!(p.get(), 1);
    /// # Ok::<(), pflotran_mesh::mesh_error::MeshError>(())
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshError> {
        NonZeroU64::new(raw)
            .map(PointId)
            .ok_or(MeshError::InvalidPointId)
    }

    /// Returns the inner `u64` value of this `PointId`.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PointId").field(&self.get()).finish()
    }
}

/// Prints only the raw integer, which is what every output format expects.
impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u64> for PointId {
    type Error = MeshError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        PointId::new(raw)
    }
}


#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let p = PointId::new(123).unwrap();
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, "123");
        let p2: PointId = serde_json::from_str(&s).unwrap();
        assert_eq!(p2, p);
    }

    #[test]
    fn zero_is_rejected_on_deserialize() {
        assert!(serde_json::from_str::<PointId>("0").is_err());
    }

    #[test]
    fn bincode_roundtrip() {
        let p = PointId::new(456).unwrap();
        let bytes = bincode::serialize(&p).unwrap();
        let p2: PointId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(p2, p);
    }
}
