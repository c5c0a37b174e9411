/// Live view tests
///
/// Streaming a stepped simulation into a rolling sample buffer paced by the
/// tick clock, plus config files on disk.
use std::io::Write;
use tempfile::NamedTempFile;
use tickwire::config::{CircuitFile, SimConfig};
use tickwire::engine::CompiledCircuit;
use tickwire::error::ConfigError;
use tickwire::graph::{CircuitGraph, PortRef};
use tickwire::registry::NodeRegistry;
use tickwire::sample_buffer::RollingBuffer;
use tickwire::stimulus::{Stimuli, Waveform};
use tickwire::tick_clock::TickClock;

#[test]
fn test_stepping_matches_full_run() {
    let registry = NodeRegistry::builtin();
    let mut graph = CircuitGraph::new();
    let input = graph.add_node(&registry, "input").unwrap();
    let mem = graph.add_node(&registry, "memory").unwrap();
    let avg = graph.add_node(&registry, "average").unwrap();
    graph.connect(PortRef::new(input, 0), PortRef::new(mem, 0));
    graph.connect(PortRef::new(input, 0), PortRef::new(avg, 0));
    graph.connect(PortRef::new(mem, 0), PortRef::new(avg, 1));

    let mut stimuli = Stimuli::new();
    stimuli.insert(input, Waveform::Samples(vec![80.0, -20.0, 40.0]));

    let circuit = CompiledCircuit::compile(&graph, &registry).unwrap();
    let full = circuit.run(&stimuli, 64).unwrap();

    let mut sim = circuit.simulate(&stimuli);
    for tick in 0..64 {
        assert_eq!(sim.tick(), tick);
        let row = sim.step().unwrap().to_vec();
        assert_eq!(Some(row.as_slice()), full.row(tick));
    }
}

#[test]
fn test_scope_keeps_latest_window() {
    let registry = NodeRegistry::builtin();
    let mut graph = CircuitGraph::new();
    let input = graph.add_node(&registry, "input").unwrap();
    let watch = graph.add_node(&registry, "output").unwrap();
    graph.connect(PortRef::new(input, 0), PortRef::new(watch, 0));

    let ramp: Vec<f32> = (0..20).map(|v| v as f32).collect();
    let mut stimuli = Stimuli::new();
    stimuli.insert(input, Waveform::Samples(ramp));

    let circuit = CompiledCircuit::compile(&graph, &registry).unwrap();
    let mut sim = circuit.simulate(&stimuli);
    let mut scope = RollingBuffer::new(8);
    let mut clock = TickClock::new(4);
    let mut downbeats = 0;

    for _ in 0..20 {
        sim.step().unwrap();
        scope.push(sim.value(PortRef::new(watch, 0)).unwrap());
        clock.advance();
        if clock.on_downbeat() {
            downbeats += 1;
        }
    }

    assert_eq!(scope.to_vec(), (12..20).map(|v| v as f32).collect::<Vec<_>>());
    assert_eq!(downbeats, 5);
    assert_eq!((clock.ticks(), clock.cycle(), clock.subdivision()), (20, 5, 0));

    scope.clear();
    clock.reset();
    assert!(scope.is_empty());
    assert_eq!((clock.ticks(), clock.cycle(), clock.subdivision()), (0, 0, 0));
}

#[test]
fn test_config_file_on_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "window_ticks = 128").unwrap();
    writeln!(file, "clock_subdivisions = 12").unwrap();

    let config = SimConfig::load(file.path()).unwrap();
    assert_eq!(config.window_ticks, 128);
    assert_eq!(config.clock_subdivisions, 12);
    assert_eq!(config.scope_capacity, 64);

    let out = NamedTempFile::new().unwrap();
    config.save(out.path()).unwrap();
    assert_eq!(SimConfig::load(out.path()).unwrap(), config);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SimConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_circuit_file_runs_for_configured_window() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "graph": {{
                "nodes": [
                    {{"id": 0, "type": "input"}},
                    {{"id": 1, "type": "add", "params": {{"amount": 0}}}}
                ],
                "wires": [{{"from": {{"node": 0, "port": 0}}, "to": {{"node": 1, "port": 0}}}}]
            }},
            "stimuli": {{"0": 50}}
        }}"#
    )
    .unwrap();

    let circuit_file = CircuitFile::load(file.path()).unwrap();
    let mut registry = NodeRegistry::builtin();
    circuit_file.prepare(&mut registry).unwrap();

    let config = SimConfig::default();
    let compiled = CompiledCircuit::compile(&circuit_file.graph, &registry).unwrap();
    let results = compiled.run(&circuit_file.stimuli, config.window_ticks).unwrap();
    assert_eq!(results.waveform(PortRef::new(1, 0)), Some(vec![50.0; 256]));
}
