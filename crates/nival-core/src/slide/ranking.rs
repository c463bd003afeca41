//! Elevation ranking: the global processing order for the routing pass.
//!
//! Effective elevation is ground elevation plus vertically-projected snow
//! depth, so a deeply loaded face ranks above a slightly higher bare one.
//! Key computation is independent per face and runs in parallel; the sort is
//! a full descending order consumed strictly in sequence by the router.
use rayon::prelude::*;

use crate::mesh::TriMesh;

use super::state::SlideState;

/// Face indices sorted by descending effective elevation.
pub fn ranked_descending(state: &SlideState, mesh: &TriMesh) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = state
        .faces
        .par_iter()
        .enumerate()
        .map(|(i, s)| (mesh.faces[i].center_z + s.snowdepth_vert, i))
        .collect();

    keyed.sort_unstable_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    keyed.into_iter().map(|(_, i)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::vert_projection;

    fn state_with_depths(mesh: &TriMesh, depths: &[f64]) -> SlideState {
        let mut state = SlideState::new(mesh.n_faces());
        for (i, &d) in depths.iter().enumerate() {
            state.reset_face(i, d, 0.0, mesh.faces[i].slope);
        }
        state
    }

    #[test]
    fn order_is_descending_in_effective_elevation() {
        let mesh = TriMesh::inclined_slab(4, 4, 100.0, 3.0, 0.2).unwrap();
        let state = state_with_depths(&mesh, &vec![0.5; mesh.n_faces()]);
        let order = ranked_descending(&state, &mesh);

        let key = |i: usize| mesh.faces[i].center_z + state.faces[i].snowdepth_vert;
        for pair in order.windows(2) {
            assert!(
                key(pair[0]) >= key(pair[1]),
                "faces {} and {} out of order",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn ties_neither_drop_nor_duplicate_faces() {
        // A flat slab with uniform depth produces many equal keys.
        let mesh = TriMesh::inclined_slab(3, 3, 100.0, 0.0, 0.0).unwrap();
        let state = state_with_depths(&mesh, &vec![1.0; mesh.n_faces()]);
        let mut order = ranked_descending(&state, &mesh);
        order.sort_unstable();
        let expected: Vec<usize> = (0..mesh.n_faces()).collect();
        assert_eq!(order, expected, "order must be a permutation of all faces");
    }

    #[test]
    fn snow_load_can_outrank_bare_ground() {
        // Face 0 sits 1 m lower but carries 3 m of snow.
        let mut mesh = TriMesh::inclined_slab(1, 2, 100.0, 0.0, 0.0).unwrap();
        mesh.faces[0].center_z = 10.0;
        mesh.faces[1].center_z = 11.0;
        let mut state = SlideState::new(mesh.n_faces());
        state.faces[0].snowdepth_vert = vert_projection(3.0, 0.0);
        let order = ranked_descending(&state, &mesh);
        assert_eq!(order[0], 0, "snow-loaded face should be processed first");
    }
}
