//! The sequential routing pass.
//!
//! Faces are visited in descending effective elevation. A face over capacity
//! sheds its excess depth and SWE to lower routable neighbors, weighted by
//! elevation difference; at the domain boundary the excess leaves the mesh
//! instead. Because an upslope face's outflow lands in a neighbor's working
//! copies before that neighbor is visited, this pass must never be
//! parallelized — the ordering alone is the synchronization.
use crate::config::SlideConfig;
use crate::error::NivalError;
use crate::fields::{FieldStore, FIELD_DELTA_MASS, FIELD_DELTA_SNOWDEPTH};
use crate::mesh::{TriMesh, NEIGHBOR_SLOTS};

use super::state::SlideState;
use super::vert_projection;

/// Absolute tolerance (m³) on routed-out vs computed excess SWE volume.
/// Drift beyond this is finite-precision weight normalization, reported but
/// never fatal.
const MASS_BALANCE_TOL: f64 = 1e-4;

/// Route excess snow downslope, visiting faces in `order`.
///
/// Mutates working depths/SWE and the transport accumulators, and writes the
/// accumulators back to the mesh fields for every face visited.
pub fn route(
    state: &mut SlideState,
    mesh: &mut TriMesh,
    cfg: &SlideConfig,
    order: &[usize],
) -> Result<(), NivalError> {
    let mut avalanched = 0usize;

    for &i in order {
        let area = mesh.faces[i].area;
        let s = state.faces[i];
        let max_depth = if cfg.use_vertical_snow {
            s.max_depth_vert
        } else {
            s.max_depth_norm
        };

        if s.snowdepth > max_depth {
            avalanched += 1;
            let del_depth = s.snowdepth - max_depth;
            let del_swe = s.swe * (1.0 - max_depth / s.snowdepth);
            let orig_mass = del_swe * area;

            // Weight each neighbor by its drop below this face's snow
            // surface. Three outcomes: an absent/ghost slot makes this a
            // boundary cell; all-zero weights make it a sink; otherwise the
            // positive weights are normalized and the excess is split.
            let z_s = mesh.faces[i].center_z + s.snowdepth_vert;
            let neighbors = mesh.faces[i].neighbors;
            let mut w = [0.0f64; NEIGHBOR_SLOTS];
            let mut w_dem = 0.0;
            let mut boundary = false;
            for (k, slot) in neighbors.iter().enumerate() {
                match slot {
                    Some(n) if !mesh.faces[*n].ghost => {
                        let n_eff = mesh.faces[*n].center_z + state.faces[*n].snowdepth_vert;
                        w[k] = (z_s - n_eff).max(0.0);
                        w_dem += w[k];
                    }
                    _ => boundary = true,
                }
            }

            if boundary {
                // Excess leaves the simulated domain: debit this face and
                // stop — no routing to whatever neighbors do exist. The
                // working vertical depth is deliberately left at its
                // pre-dump value; later-ranked faces weigh their outflow
                // against this face's old snow surface.
                let src = &mut state.faces[i];
                src.snowdepth = max_depth;
                src.swe = s.swe * max_depth / s.snowdepth;
                src.delta_snowdepth -= del_depth * area;
                src.delta_mass -= del_swe * area;
                write_back(state, &mut mesh.fields, i)?;
                continue;
            }

            if w_dem == 0.0 {
                // Sink: no lower neighbor. The face keeps its excess and its
                // accumulators are untouched this pass.
                write_back(state, &mut mesh.fields, i)?;
                continue;
            }

            for x in &mut w {
                *x /= w_dem;
            }

            let mut out_mass = 0.0;
            for (k, slot) in neighbors.iter().enumerate() {
                // boundary == false, so every slot is a routable neighbor.
                let Some(n) = *slot else { continue };
                let n_area = mesh.faces[n].area;
                let dst = &mut state.faces[n];

                // The area ratio converts a depth change on this face's
                // footprint into the equivalent depth on the neighbor's.
                // Uniform pack density is assumed throughout.
                dst.snowdepth += del_depth * (area / n_area) * w[k];
                dst.swe += del_swe * (area / n_area) * w[k];
                // Vertical re-projection reuses the source face's slope; an
                // intentional simplification of the underlying model.
                dst.snowdepth_vert = vert_projection(dst.snowdepth, s.slope);

                dst.delta_snowdepth += del_depth * area * w[k];
                dst.delta_mass += del_swe * area * w[k];
                out_mass += del_swe * area * w[k];
            }

            let src = &mut state.faces[i];
            src.snowdepth = max_depth;
            src.snowdepth_vert = vert_projection(max_depth, s.slope);
            src.swe = s.swe * max_depth / s.snowdepth;
            src.delta_snowdepth -= del_depth * area;
            src.delta_mass -= del_swe * area;

            if (orig_mass - out_mass).abs() > MASS_BALANCE_TOL {
                log::warn!(
                    "avalanche mass balance drift at face {i}: routed {out_mass:.6} m³ of {orig_mass:.6} m³ excess"
                );
            }
        }

        write_back(state, &mut mesh.fields, i)?;
    }

    log::debug!("routing pass complete: {avalanched} of {} faces avalanched", order.len());
    Ok(())
}

/// Publish the two accumulator fields for face `i`.
fn write_back(state: &SlideState, fields: &mut FieldStore, i: usize) -> Result<(), NivalError> {
    fields.set_value(FIELD_DELTA_SNOWDEPTH, i, state.faces[i].delta_snowdepth)?;
    fields.set_value(FIELD_DELTA_MASS, i, state.faces[i].delta_mass)?;
    Ok(())
}
