//! Gravitational snow redistribution over the watershed mesh.
//!
//! Each timestep runs three phases:
//! 1. Preparation — copy `snowdepthavg`/`swe` into per-face working state
//!    (parallel, no cross-face reads).
//! 2. Ranking — effective-elevation sort, highest first (parallel keys, one
//!    full sort, then a barrier).
//! 3. Routing — a single strictly sequential sweep that moves excess snow
//!    downslope or off the domain.
pub mod capacity;
pub mod ranking;
pub mod router;
pub mod state;

use rayon::prelude::*;

use crate::checkpoint::StateStore;
use crate::config::SlideConfig;
use crate::error::NivalError;
use crate::fields::{
    FIELD_DELTA_MASS, FIELD_DELTA_SNOWDEPTH, FIELD_SNOWDEPTH, FIELD_SWE,
};
use crate::mesh::TriMesh;
use crate::module::Module;

use state::SlideState;

/// Floor on cos(slope) guarding vertical projection on near-90° faces.
pub(crate) const COS_FLOOR: f64 = 0.001;

/// Checkpoint variable names (stable across runs and versions).
const CHKPT_DELTA_SNOWDEPTH: &str = "snow_slide:delta_avalanche_snowdepth";
const CHKPT_DELTA_MASS: &str = "snow_slide:delta_avalanche_mass";

/// Vertically-projected depth from a surface-normal depth.
#[inline]
pub(crate) fn vert_projection(depth: f64, slope: f64) -> f64 {
    depth / slope.cos().max(COS_FLOOR)
}

/// The avalanche redistribution module.
pub struct SnowSlide {
    config: SlideConfig,
    state: SlideState,
    initialized: bool,
}

impl SnowSlide {
    /// Fails fast on malformed configuration.
    pub fn new(config: SlideConfig) -> Result<Self, NivalError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SlideState::default(),
            initialized: false,
        })
    }

    pub fn config(&self) -> &SlideConfig {
        &self.config
    }

    /// Read access to the per-face working state (tests, diagnostics).
    pub fn state(&self) -> &SlideState {
        &self.state
    }

    /// Copy-in phase: rebuild working state from the mesh fields and zero
    /// the accumulators. Independent per face, runs in parallel.
    fn prepare(&mut self, mesh: &TriMesh) -> Result<(), NivalError> {
        let depth = mesh.fields.get(FIELD_SNOWDEPTH)?;
        let swe = mesh.fields.get(FIELD_SWE)?;
        for (name, field) in [(FIELD_SNOWDEPTH, depth), (FIELD_SWE, swe)] {
            if field.len() != self.state.len() {
                return Err(NivalError::FieldLength {
                    name: name.to_string(),
                    len: field.len(),
                    expected: self.state.len(),
                });
            }
        }

        let faces = &mesh.faces;
        self.state
            .faces
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, s)| {
                let slope = faces[i].slope;
                s.snowdepth = depth[i];
                s.snowdepth_vert = vert_projection(depth[i], slope);
                s.swe = swe[i] / 1000.0; // mm → m
                s.slope = slope;
                s.delta_snowdepth = 0.0;
                s.delta_mass = 0.0;
            });
        Ok(())
    }
}

impl Module for SnowSlide {
    fn name(&self) -> &'static str {
        "snow_slide"
    }

    fn initialize(&mut self, mesh: &mut TriMesh) -> Result<(), NivalError> {
        self.state = SlideState::new(mesh.n_faces());
        mesh.fields.register(FIELD_DELTA_SNOWDEPTH);
        mesh.fields.register(FIELD_DELTA_MASS);
        capacity::init_capacity(&mut self.state, mesh, &self.config)?;
        self.initialized = true;
        Ok(())
    }

    fn advance(&mut self, mesh: &mut TriMesh, step: u64) -> Result<(), NivalError> {
        if !self.initialized {
            return Err(NivalError::Uninitialized);
        }
        log::debug!("snow_slide: timestep {step}, {} faces", self.state.len());

        self.prepare(mesh)?;
        let order = ranking::ranked_descending(&self.state, mesh);
        router::route(&mut self.state, mesh, &self.config, &order)
    }

    fn save_state(&self, store: &mut StateStore) -> Result<(), NivalError> {
        store.create_var(CHKPT_DELTA_SNOWDEPTH, self.state.len());
        store.create_var(CHKPT_DELTA_MASS, self.state.len());
        for (i, s) in self.state.faces.iter().enumerate() {
            store.put(CHKPT_DELTA_SNOWDEPTH, i, s.delta_snowdepth)?;
            store.put(CHKPT_DELTA_MASS, i, s.delta_mass)?;
        }
        Ok(())
    }

    fn load_state(&mut self, store: &StateStore) -> Result<(), NivalError> {
        if !self.initialized {
            return Err(NivalError::Uninitialized);
        }
        let depth = store.var(CHKPT_DELTA_SNOWDEPTH)?;
        let mass = store.var(CHKPT_DELTA_MASS)?;
        for (name, var) in [(CHKPT_DELTA_SNOWDEPTH, depth), (CHKPT_DELTA_MASS, mass)] {
            if var.len() != self.state.len() {
                return Err(NivalError::FieldLength {
                    name: name.to_string(),
                    len: var.len(),
                    expected: self.state.len(),
                });
            }
        }
        for (i, s) in self.state.faces.iter_mut().enumerate() {
            s.delta_snowdepth = depth[i];
            s.delta_mass = mass[i];
        }
        Ok(())
    }
}
