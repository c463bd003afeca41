//! Per-face working state for one timestep of redistribution.
use super::vert_projection;

/// Scratch copies plus the two persisted transport accumulators.
///
/// Working copies are rebuilt from the mesh fields at the start of every
/// timestep; `max_depth_*` is computed once at initialization; the
/// accumulators survive timesteps (and checkpoints) but are zeroed at the
/// start of each prep phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceState {
    /// Snow depth normal to the surface (m).
    pub snowdepth: f64,
    /// Vertically-projected snow depth (m).
    pub snowdepth_vert: f64,
    /// Snow water equivalent (m, converted from the mm mesh field).
    pub swe: f64,
    /// Face slope (rad), cached from geometry.
    pub slope: f64,
    /// Holding capacity normal to the surface (m).
    pub max_depth_norm: f64,
    /// Holding capacity taken vertically (m).
    pub max_depth_vert: f64,
    /// Net transported snow-depth volume this timestep (m³).
    pub delta_snowdepth: f64,
    /// Net transported SWE volume this timestep (m³).
    pub delta_mass: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SlideState {
    pub faces: Vec<FaceState>,
}

impl SlideState {
    pub fn new(n_faces: usize) -> Self {
        Self {
            faces: vec![FaceState::default(); n_faces],
        }
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Reset one face's working copies from fresh field values, zeroing the
    /// accumulators. Capacity fields are left untouched.
    pub fn reset_face(&mut self, index: usize, snowdepth: f64, swe_mm: f64, slope: f64) {
        let s = &mut self.faces[index];
        s.snowdepth = snowdepth;
        s.snowdepth_vert = vert_projection(snowdepth, slope);
        s.swe = swe_mm / 1000.0;
        s.slope = slope;
        s.delta_snowdepth = 0.0;
        s.delta_mass = 0.0;
    }
}
