//! Slope- and canopy-dependent snow holding capacity.
//!
//! Steeper faces hold less snow before avalanching, following a power law in
//! slope angle; vegetation canopy sets a floor because the canopy anchors the
//! pack. Computed once per face at initialization and immutable thereafter.
use crate::config::SlideConfig;
use crate::error::NivalError;
use crate::fields::FIELD_MAX_DEPTH;
use crate::mesh::TriMesh;

use super::state::SlideState;
use super::COS_FLOOR;

/// Slope floor (degrees) for the power law; avoids the singularity of
/// `slopeDeg^pow` with a negative exponent on near-flat faces.
const SLOPE_FLOOR_DEG: f64 = 10.0;

/// Compute `max_depth_norm`/`max_depth_vert` for every face and publish the
/// normal capacity to the mesh under `maxDepth`.
pub fn init_capacity(
    state: &mut SlideState,
    mesh: &mut TriMesh,
    cfg: &SlideConfig,
) -> Result<(), NivalError> {
    mesh.fields.register(FIELD_MAX_DEPTH);

    for (i, s) in state.faces.iter_mut().enumerate() {
        let face = &mesh.faces[i];
        let canopy = face.canopy_height.unwrap_or(0.0);

        let slope_deg = face.slope.to_degrees().max(SLOPE_FLOOR_DEG);
        s.max_depth_norm = (cfg.avalanche_mult * slope_deg.powf(cfg.avalanche_pow)).max(canopy);
        s.max_depth_vert = s.max_depth_norm * face.slope.cos().max(COS_FLOOR);
        s.slope = face.slope;

        mesh.fields.set_value(FIELD_MAX_DEPTH, i, s.max_depth_norm)?;
    }
    Ok(())
}
