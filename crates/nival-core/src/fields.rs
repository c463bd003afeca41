//! Named per-face scalar storage.
//!
//! Every face of the mesh carries a set of named `f64` fields. Producers
//! (snowpack models, interpolators) write `snowdepthavg` and `swe`; the
//! avalanche engine owns `delta_avalanche_snowdepth`, `delta_avalanche_mass`
//! and `maxDepth`. Field keys are stable strings so that checkpoint files and
//! downstream consumers line up across runs.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::NivalError;

/// Snow depth normal to the surface (m). Externally produced each timestep.
pub const FIELD_SNOWDEPTH: &str = "snowdepthavg";
/// Snow water equivalent (mm). Externally produced each timestep.
pub const FIELD_SWE: &str = "swe";
/// Net avalanched snow-depth volume (m³). Owned by the engine.
pub const FIELD_DELTA_SNOWDEPTH: &str = "delta_avalanche_snowdepth";
/// Net avalanched SWE volume (m³). Owned by the engine.
pub const FIELD_DELTA_MASS: &str = "delta_avalanche_mass";
/// Holding capacity (m), written once at initialization.
pub const FIELD_MAX_DEPTH: &str = "maxDepth";

/// Per-face scalar fields, `name -> Vec<f64>` with length = face count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldStore {
    n_faces: usize,
    fields: HashMap<String, Vec<f64>>,
}

impl FieldStore {
    pub fn new(n_faces: usize) -> Self {
        Self {
            n_faces,
            fields: HashMap::new(),
        }
    }

    pub fn n_faces(&self) -> usize {
        self.n_faces
    }

    /// Register a field, zero-filled. Re-registering an existing field keeps
    /// its current values.
    pub fn register(&mut self, name: &str) {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| vec![0.0; self.n_faces]);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&[f64], NivalError> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| NivalError::UnknownField(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut [f64], NivalError> {
        self.fields
            .get_mut(name)
            .map(Vec::as_mut_slice)
            .ok_or_else(|| NivalError::UnknownField(name.to_string()))
    }

    /// Read one value with bounds checking.
    pub fn value(&self, name: &str, index: usize) -> Result<f64, NivalError> {
        let data = self.get(name)?;
        data.get(index).copied().ok_or(NivalError::FaceIndex {
            index,
            n_faces: self.n_faces,
        })
    }

    /// Write one value with bounds checking.
    pub fn set_value(&mut self, name: &str, index: usize, value: f64) -> Result<(), NivalError> {
        let n_faces = self.n_faces;
        let data = self.get_mut(name)?;
        *data.get_mut(index).ok_or(NivalError::FaceIndex { index, n_faces })? = value;
        Ok(())
    }

    /// Overwrite a whole field from a slice; length must match the face count.
    pub fn fill_from(&mut self, name: &str, values: &[f64]) -> Result<(), NivalError> {
        if values.len() != self.n_faces {
            return Err(NivalError::FieldLength {
                name: name.to_string(),
                len: values.len(),
                expected: self.n_faces,
            });
        }
        let data = self.get_mut(name)?;
        data.copy_from_slice(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_set_get_roundtrip() {
        let mut store = FieldStore::new(4);
        store.register(FIELD_SNOWDEPTH);
        store.set_value(FIELD_SNOWDEPTH, 2, 1.5).unwrap();
        assert_eq!(store.value(FIELD_SNOWDEPTH, 2).unwrap(), 1.5);
        assert_eq!(store.value(FIELD_SNOWDEPTH, 0).unwrap(), 0.0);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let store = FieldStore::new(4);
        assert!(matches!(
            store.get("no_such_field"),
            Err(NivalError::UnknownField(_))
        ));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut store = FieldStore::new(2);
        store.register(FIELD_SWE);
        assert!(matches!(
            store.set_value(FIELD_SWE, 2, 0.0),
            Err(NivalError::FaceIndex { index: 2, .. })
        ));
    }

    #[test]
    fn reregister_keeps_existing_values() {
        let mut store = FieldStore::new(3);
        store.register(FIELD_SWE);
        store.set_value(FIELD_SWE, 1, 250.0).unwrap();
        store.register(FIELD_SWE);
        assert_eq!(store.value(FIELD_SWE, 1).unwrap(), 250.0);
    }

    #[test]
    fn fill_from_rejects_wrong_length() {
        let mut store = FieldStore::new(3);
        store.register(FIELD_SNOWDEPTH);
        assert!(matches!(
            store.fill_from(FIELD_SNOWDEPTH, &[1.0, 2.0]),
            Err(NivalError::FieldLength { .. })
        ));
    }
}
