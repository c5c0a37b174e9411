/// Parameter descriptors and editing-boundary validation
///
/// Parameter writes are checked here, before a graph ever reaches the engine.
/// The engine assumes every value it sees already satisfies its descriptor.

use crate::error::ConfigError;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter values of one node instance, keyed by parameter key
///
/// Ordered so serialized graphs and digests are stable.
pub type ParamValues = BTreeMap<String, Signal>;

/// Numeric type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Float,
}

/// Declarative description of one node parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub key: String,
    pub kind: ParamKind,
    pub default: Signal,
    pub min: Signal,
    pub max: Signal,
    pub step: Signal,
    pub label: String,
}

/// Tolerance for step-grid checks on f32 values
const STEP_EPSILON: f32 = 1.0e-4;

impl ParamDescriptor {
    /// Integer parameter with step 1
    pub fn integer(key: &str, label: &str, default: Signal, min: Signal, max: Signal) -> Self {
        Self {
            key: key.to_string(),
            kind: ParamKind::Integer,
            default,
            min,
            max,
            step: 1.0,
            label: label.to_string(),
        }
    }

    /// Check a candidate value against range, integrality and step
    pub fn validate(&self, value: Signal) -> Result<(), ConfigError> {
        if value.is_nan() || value < self.min || value > self.max {
            return Err(ConfigError::OutOfRange {
                key: self.key.clone(),
                value,
                min: self.min,
                max: self.max,
            });
        }

        if self.kind == ParamKind::Integer && value.fract() != 0.0 {
            return Err(ConfigError::NotIntegral {
                key: self.key.clone(),
                value,
            });
        }

        if self.step > 0.0 {
            let steps = (value - self.min) / self.step;
            if (steps - steps.round()).abs() > STEP_EPSILON {
                return Err(ConfigError::OffStep {
                    key: self.key.clone(),
                    value,
                    step: self.step,
                });
            }
        }

        Ok(())
    }
}

/// Default values for every declared parameter
pub fn defaults(descriptors: &[ParamDescriptor]) -> ParamValues {
    descriptors
        .iter()
        .map(|p| (p.key.clone(), p.default))
        .collect()
}

/// Validate a complete value map for a node type
///
/// Unknown keys are rejected; missing keys are tolerated (readers fall back
/// to the descriptor default).
pub fn validate_all(
    type_id: &str,
    descriptors: &[ParamDescriptor],
    values: &ParamValues,
) -> Result<(), ConfigError> {
    for (key, &value) in values {
        let descriptor = descriptors
            .iter()
            .find(|p| &p.key == key)
            .ok_or_else(|| ConfigError::UnknownParam {
                type_id: type_id.to_string(),
                key: key.clone(),
            })?;
        descriptor.validate(value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_checks_are_inclusive() {
        let p = ParamDescriptor::integer("amount", "Amount", 0.0, -100.0, 100.0);
        assert!(p.validate(-100.0).is_ok());
        assert!(p.validate(100.0).is_ok());
        assert!(matches!(
            p.validate(101.0),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            p.validate(Signal::NAN),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let p = ParamDescriptor::integer("subdivisions", "Ticks", 1.0, 0.0, 16.0);
        assert!(matches!(
            p.validate(2.5),
            Err(ConfigError::NotIntegral { .. })
        ));
    }

    #[test]
    fn test_float_step_grid() {
        let p = ParamDescriptor {
            key: "gain".to_string(),
            kind: ParamKind::Float,
            default: 100.0,
            min: -200.0,
            max: 200.0,
            step: 5.0,
            label: "Gain".to_string(),
        };
        assert!(p.validate(15.0).is_ok());
        assert!(p.validate(-200.0).is_ok());
        assert!(matches!(p.validate(12.0), Err(ConfigError::OffStep { .. })));
    }

    #[test]
    fn test_validate_all_rejects_unknown_key() {
        let descriptors = vec![ParamDescriptor::integer("amount", "Amount", 0.0, -100.0, 100.0)];
        let mut values = defaults(&descriptors);
        assert!(validate_all("add", &descriptors, &values).is_ok());

        values.insert("bogus".to_string(), 1.0);
        assert!(matches!(
            validate_all("add", &descriptors, &values),
            Err(ConfigError::UnknownParam { .. })
        ));
    }
}
