//! The capability interface a simulation driver invokes once per timestep.
//!
//! A module is initialized against a mesh once, advanced every timestep, and
//! may persist a subset of its state across restarts through a `StateStore`.
//! How modules are discovered or ordered is the driver's business; this crate
//! only defines the seam.
use crate::checkpoint::StateStore;
use crate::error::NivalError;
use crate::mesh::TriMesh;

pub trait Module {
    /// Stable module identifier, also used to namespace checkpoint variables.
    fn name(&self) -> &'static str;

    /// One-time setup: allocate per-face state, register provided fields,
    /// compute init-once parameters.
    fn initialize(&mut self, mesh: &mut TriMesh) -> Result<(), NivalError>;

    /// Run one timestep. `step` is a monotone counter used only for
    /// diagnostics.
    fn advance(&mut self, mesh: &mut TriMesh, step: u64) -> Result<(), NivalError>;

    /// Persist restart-relevant state into the store.
    fn save_state(&self, store: &mut StateStore) -> Result<(), NivalError>;

    /// Restore previously saved state; must be called after `initialize`.
    fn load_state(&mut self, store: &StateStore) -> Result<(), NivalError>;
}
