//! Crate-wide error taxonomy.
//!
//! Structural problems (bad face index, missing per-face field) are fatal and
//! surface to the caller; mass-balance drift is a logged diagnostic and never
//! appears here.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NivalError {
    /// Malformed tunable parameters, rejected at initialization.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A named per-face field was requested but never registered.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A field or checkpoint array does not match the mesh face count.
    #[error("field '{name}' has length {len}, expected {expected}")]
    FieldLength {
        name: String,
        len: usize,
        expected: usize,
    },

    /// A face index outside the mesh. Indicates an upstream contract
    /// violation by the mesh producer.
    #[error("face index {index} out of range for mesh of {n_faces} faces")]
    FaceIndex { index: usize, n_faces: usize },

    /// A module operation was called before `initialize`.
    #[error("module used before initialize()")]
    Uninitialized,

    /// A checkpoint variable expected by `load_state` is absent.
    #[error("checkpoint variable '{0}' not found")]
    MissingCheckpointVar(String),

    #[error("checkpoint serialization: {0}")]
    Checkpoint(#[from] serde_json::Error),
}
