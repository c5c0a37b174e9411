/// Configuration and circuit files
///
/// - `SimConfig` - TOML run settings (window length, clock cycle, scope size)
/// - `CircuitFile` - JSON puzzle file: sub-circuit definitions, the top-level
///   graph and its input stimuli

use crate::error::{ConfigError, SimResult};
use crate::engine::DEFAULT_WINDOW_TICKS;
use crate::graph::CircuitGraph;
use crate::registry::NodeRegistry;
use crate::stimulus::Stimuli;
use crate::subcircuit::CircuitDefinition;
use crate::tick_clock::SUBDIVISIONS_PER_CYCLE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Default Rolling Sample Buffer capacity for live view
pub const DEFAULT_SCOPE_CAPACITY: usize = 64;

/// Run settings
///
/// Missing keys take their defaults, so an empty file is a valid config.
///
/// ```toml
/// window_ticks = 256
/// clock_subdivisions = 16
/// scope_capacity = 64
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks evaluated per engine run
    pub window_ticks: usize,
    /// Tick clock cycle length (independent of `window_ticks`)
    pub clock_subdivisions: u64,
    /// Values retained by the live scope
    pub scope_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            window_ticks: DEFAULT_WINDOW_TICKS,
            clock_subdivisions: SUBDIVISIONS_PER_CYCLE,
            scope_capacity: DEFAULT_SCOPE_CAPACITY,
        }
    }
}

impl SimConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML content and validate it
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        debug!("{:?}", config);
        Ok(config)
    }

    /// Reject settings no run can use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ticks == 0 {
            return Err(ConfigError::Invalid("window_ticks must be at least 1".to_string()));
        }
        if self.clock_subdivisions == 0 {
            return Err(ConfigError::Invalid(
                "clock_subdivisions must be at least 1".to_string(),
            ));
        }
        if self.scope_capacity == 0 {
            return Err(ConfigError::Invalid("scope_capacity must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Save to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// A puzzle circuit as stored on disk
///
/// ```json
/// {
///   "circuits": [{"name": "boost", "graph": {"nodes": [], "wires": []}}],
///   "graph": {"nodes": [{"id": 0, "type": "input"}], "wires": []},
///   "stimuli": {"0": [10, 20, 30]}
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitFile {
    /// Sub-circuits, registered in order before the graph is checked
    #[serde(default)]
    pub circuits: Vec<CircuitDefinition>,
    pub graph: CircuitGraph,
    /// Waveform per input node id
    #[serde(default)]
    pub stimuli: Stimuli,
}

impl CircuitFile {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Register the sub-circuits and validate every parameter
    ///
    /// This is the editing boundary for graphs that arrive from disk.
    pub fn prepare(&self, registry: &mut NodeRegistry) -> SimResult<()> {
        for definition in &self.circuits {
            definition.graph.validate_params(registry)?;
            definition.register(registry)?;
        }
        self.graph.validate_params(registry)?;
        debug!(
            "Prepared circuit file: {} sub-circuits, {} nodes, {} stimuli",
            self.circuits.len(),
            self.graph.nodes.len(),
            self.stimuli.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::stimulus::Waveform;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = SimConfig::parse("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.window_ticks, 256);
        assert_eq!(config.clock_subdivisions, 16);
    }

    #[test]
    fn test_partial_override() {
        let config = SimConfig::parse("window_ticks = 32").unwrap();
        assert_eq!(config.window_ticks, 32);
        assert_eq!(config.scope_capacity, DEFAULT_SCOPE_CAPACITY);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(matches!(
            SimConfig::parse("scope_capacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::parse("window_ticks = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig {
            window_ticks: 64,
            clock_subdivisions: 8,
            scope_capacity: 5,
        };
        assert_eq!(SimConfig::parse(&config.to_toml().unwrap()).unwrap(), config);
    }

    #[test]
    fn test_circuit_file_prepare() {
        let json = r#"{
            "circuits": [{
                "name": "half",
                "graph": {
                    "nodes": [
                        {"id": 0, "type": "input"},
                        {"id": 1, "type": "amplify", "params": {"gain": 50}},
                        {"id": 2, "type": "output"}
                    ],
                    "wires": [
                        {"from": {"node": 0, "port": 0}, "to": {"node": 1, "port": 0}},
                        {"from": {"node": 1, "port": 0}, "to": {"node": 2, "port": 0}}
                    ]
                }
            }],
            "graph": {
                "nodes": [{"id": 0, "type": "input"}, {"id": 1, "type": "circuit:half"}],
                "wires": [{"from": {"node": 0, "port": 0}, "to": {"node": 1, "port": 0}}]
            },
            "stimuli": {"0": [10, 70]}
        }"#;
        let file = CircuitFile::parse(json).unwrap();
        assert_eq!(file.stimuli[&0], Waveform::Samples(vec![10.0, 70.0]));

        let mut registry = NodeRegistry::builtin();
        file.prepare(&mut registry).unwrap();
        assert!(registry.contains("circuit:half"));
    }

    #[test]
    fn test_circuit_file_bad_param() {
        let json = r#"{"graph": {"nodes": [{"id": 0, "type": "delay", "params": {"subdivisions": 40}}]}}"#;
        let file = CircuitFile::parse(json).unwrap();
        let mut registry = NodeRegistry::builtin();
        assert!(matches!(
            file.prepare(&mut registry),
            Err(SimError::Config(_))
        ));
    }
}
