//! Gravitational snow redistribution (avalanching) over an unstructured
//! triangular watershed mesh.
//!
//! When a face's snow depth exceeds its slope- and canopy-dependent holding
//! capacity, the excess moves downslope to lower neighbors, or off the domain
//! at the mesh rim, conserving mass. Processing order is by descending
//! effective elevation so that inflow from above is always visible before a
//! face's own capacity check runs.
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod fields;
pub mod mesh;
pub mod module;
pub mod slide;

pub use checkpoint::StateStore;
pub use config::SlideConfig;
pub use error::NivalError;
pub use fields::FieldStore;
pub use mesh::{Face, TriMesh};
pub use module::Module;
pub use slide::SnowSlide;
