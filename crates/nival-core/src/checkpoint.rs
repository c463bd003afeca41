//! Restart-state container: named one-dimensional `f64` arrays.
//!
//! The store is deliberately dumb — no versioning, no per-variable metadata.
//! Variables are keyed `"<module>:<field>"` and indexed by face, so a restore
//! reproduces the persisted values bit-exactly.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::error::NivalError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateStore {
    vars: HashMap<String, Vec<f64>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or reset) a variable of the given length, zero-filled.
    pub fn create_var(&mut self, name: &str, len: usize) {
        self.vars.insert(name.to_string(), vec![0.0; len]);
    }

    pub fn put(&mut self, name: &str, index: usize, value: f64) -> Result<(), NivalError> {
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| NivalError::MissingCheckpointVar(name.to_string()))?;
        let n_faces = var.len();
        *var.get_mut(index)
            .ok_or(NivalError::FaceIndex { index, n_faces })? = value;
        Ok(())
    }

    pub fn get(&self, name: &str, index: usize) -> Result<f64, NivalError> {
        let var = self
            .vars
            .get(name)
            .ok_or_else(|| NivalError::MissingCheckpointVar(name.to_string()))?;
        var.get(index).copied().ok_or(NivalError::FaceIndex {
            index,
            n_faces: var.len(),
        })
    }

    pub fn var(&self, name: &str) -> Result<&[f64], NivalError> {
        self.vars
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| NivalError::MissingCheckpointVar(name.to_string()))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), NivalError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, NivalError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
