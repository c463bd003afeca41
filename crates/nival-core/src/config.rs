//! Avalanche engine configuration.
use serde::{Deserialize, Serialize};

use crate::error::NivalError;

/// Tunables for the holding-capacity curve and the capacity comparison.
///
/// `maxDepth_norm = max(avalanche_mult · slopeDeg^avalanche_pow, canopy)`
/// with the slope floored at 10°. Defaults reproduce the published
/// parametrization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideConfig {
    /// Compare vertically-projected snow depth against capacity (true) or
    /// surface-normal depth (false).
    #[serde(default = "default_use_vertical_snow")]
    pub use_vertical_snow: bool,
    /// Capacity-curve multiplier (m). Must be positive.
    #[serde(default = "default_avalanche_mult")]
    pub avalanche_mult: f64,
    /// Capacity-curve exponent (dimensionless, negative for a capacity that
    /// shrinks with slope).
    #[serde(default = "default_avalanche_pow")]
    pub avalanche_pow: f64,
}

fn default_use_vertical_snow() -> bool {
    true
}

fn default_avalanche_mult() -> f64 {
    3178.4
}

fn default_avalanche_pow() -> f64 {
    -1.998
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            use_vertical_snow: default_use_vertical_snow(),
            avalanche_mult: default_avalanche_mult(),
            avalanche_pow: default_avalanche_pow(),
        }
    }
}

impl SlideConfig {
    /// Reject parameters that would produce non-positive or undefined
    /// holding capacities.
    pub fn validate(&self) -> Result<(), NivalError> {
        if !self.avalanche_mult.is_finite() || self.avalanche_mult <= 0.0 {
            return Err(NivalError::Config(format!(
                "avalanche_mult must be positive, got {}",
                self.avalanche_mult
            )));
        }
        if !self.avalanche_pow.is_finite() {
            return Err(NivalError::Config(format!(
                "avalanche_pow must be finite, got {}",
                self.avalanche_pow
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SlideConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.use_vertical_snow);
        assert_eq!(cfg.avalanche_mult, 3178.4);
        assert_eq!(cfg.avalanche_pow, -1.998);
    }

    #[test]
    fn non_positive_mult_rejected() {
        let cfg = SlideConfig {
            avalanche_mult: 0.0,
            ..SlideConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(NivalError::Config(_))));
    }

    #[test]
    fn missing_json_keys_take_defaults() {
        let cfg: SlideConfig = serde_json::from_str("{}").unwrap();
        assert!(cfg.use_vertical_snow);
        assert_eq!(cfg.avalanche_mult, 3178.4);

        let cfg: SlideConfig = serde_json::from_str(r#"{"use_vertical_snow": false}"#).unwrap();
        assert!(!cfg.use_vertical_snow);
        assert_eq!(cfg.avalanche_pow, -1.998);
    }
}
