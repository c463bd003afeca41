//! Unstructured triangular mesh: per-face geometry, adjacency and fields.
//!
//! The mesh is a flat arena of faces addressed by index. Each face has up to
//! three neighbor slots; an empty slot marks a domain boundary, and a
//! neighbor flagged as ghost is non-physical padding that routing must treat
//! like a boundary. Geometry is read-only to the physics; the named field
//! store carries all mutable per-face scalars.
use serde::{Deserialize, Serialize};

use crate::error::NivalError;
use crate::fields::FieldStore;

/// Neighbor slots per triangular face.
pub const NEIGHBOR_SLOTS: usize = 3;

/// One triangular face of the watershed surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Face {
    /// Planar area (m²).
    pub area: f64,
    /// Slope angle (radians).
    pub slope: f64,
    /// Center elevation (m).
    pub center_z: f64,
    /// Adjacent face indices; `None` marks a domain boundary edge.
    pub neighbors: [Option<usize>; NEIGHBOR_SLOTS],
    /// Non-physical padding face; ignored as a routing target.
    pub ghost: bool,
    /// Vegetation canopy height (m), if the face is vegetated.
    pub canopy_height: Option<f64>,
}

/// The mesh: a face arena plus the named per-face field store.
///
/// `faces` is geometry and adjacency — treat it as read-only after
/// construction. All timestep-mutable state lives in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriMesh {
    pub faces: Vec<Face>,
    pub fields: FieldStore,
}

impl TriMesh {
    /// Build a mesh from faces, validating neighbor indices.
    pub fn new(faces: Vec<Face>) -> Result<Self, NivalError> {
        let n_faces = faces.len();
        for face in &faces {
            for slot in face.neighbors.iter().flatten() {
                if *slot >= n_faces {
                    return Err(NivalError::FaceIndex {
                        index: *slot,
                        n_faces,
                    });
                }
            }
        }
        Ok(Self {
            faces,
            fields: FieldStore::new(n_faces),
        })
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// True if any neighbor slot is absent or points at a ghost face.
    pub fn is_boundary(&self, index: usize) -> bool {
        self.faces[index].neighbors.iter().any(|slot| match slot {
            Some(n) => self.faces[*n].ghost,
            None => true,
        })
    }

    /// Synthetic test/demo mesh: a triangulated inclined slab.
    ///
    /// A `rows`×`cols` grid of quads, each split into a lower (L) and an
    /// upper (U) triangle sharing the quad diagonal. Elevation drops by
    /// `drop_per_row` per row of quads, with the L triangle a quarter-step
    /// above the quad midline and the U triangle a quarter-step below, so
    /// every interior face has at least one strictly lower neighbor.
    /// Rim faces have absent neighbor slots and act as boundary cells.
    pub fn inclined_slab(
        rows: usize,
        cols: usize,
        face_area: f64,
        drop_per_row: f64,
        slope: f64,
    ) -> Result<Self, NivalError> {
        let lower = |r: usize, c: usize| 2 * (r * cols + c);
        let upper = |r: usize, c: usize| 2 * (r * cols + c) + 1;

        let mut faces = Vec::with_capacity(2 * rows * cols);
        for r in 0..rows {
            let base_z = (rows - 1 - r) as f64 * drop_per_row;
            for c in 0..cols {
                // L: shares the diagonal with U, the west edge with U(r,c-1)
                // and the uphill edge with U(r-1,c).
                faces.push(Face {
                    area: face_area,
                    slope,
                    center_z: base_z + 0.25 * drop_per_row,
                    neighbors: [
                        Some(upper(r, c)),
                        (c > 0).then(|| upper(r, c - 1)),
                        (r > 0).then(|| upper(r - 1, c)),
                    ],
                    ghost: false,
                    canopy_height: None,
                });
                // U: shares the diagonal with L, the east edge with L(r,c+1)
                // and the downhill edge with L(r+1,c).
                faces.push(Face {
                    area: face_area,
                    slope,
                    center_z: base_z - 0.25 * drop_per_row,
                    neighbors: [
                        Some(lower(r, c)),
                        (c + 1 < cols).then(|| lower(r, c + 1)),
                        (r + 1 < rows).then(|| lower(r + 1, c)),
                    ],
                    ghost: false,
                    canopy_height: None,
                });
            }
        }
        Self::new(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_neighbor() {
        let face = Face {
            area: 1.0,
            slope: 0.0,
            center_z: 0.0,
            neighbors: [Some(5), None, None],
            ghost: false,
            canopy_height: None,
        };
        assert!(matches!(
            TriMesh::new(vec![face]),
            Err(NivalError::FaceIndex { index: 5, .. })
        ));
    }

    #[test]
    fn slab_adjacency_is_symmetric() {
        let mesh = TriMesh::inclined_slab(4, 5, 100.0, 2.0, 0.3).unwrap();
        for (i, face) in mesh.faces.iter().enumerate() {
            for n in face.neighbors.iter().flatten() {
                assert!(
                    mesh.faces[*n].neighbors.contains(&Some(i)),
                    "face {n} does not list {i} back"
                );
            }
        }
    }

    #[test]
    fn slab_interior_faces_are_fully_connected() {
        let rows = 4;
        let cols = 5;
        let mesh = TriMesh::inclined_slab(rows, cols, 100.0, 2.0, 0.3).unwrap();
        let interior = (0..mesh.n_faces()).filter(|&i| !mesh.is_boundary(i)).count();
        // Row 0 L-faces and last-row U-faces miss the uphill/downhill slot;
        // col 0 L-faces and last-col U-faces miss the west/east slot.
        let expected = 2 * rows * cols - (2 * cols + 2 * rows - 2);
        assert_eq!(interior, expected, "interior face count");
    }

    #[test]
    fn slab_elevation_decreases_downslope() {
        let mesh = TriMesh::inclined_slab(3, 2, 100.0, 2.0, 0.3).unwrap();
        // U(0,0) → L(1,0) is the downhill edge.
        let u00 = &mesh.faces[1];
        let l10 = &mesh.faces[2 * 2];
        assert!(u00.center_z > l10.center_z);
    }
}
