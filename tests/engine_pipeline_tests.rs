use clockskew::core::channels;
use clockskew::engine::Pipeline;
use clockskew::{MismatchConfig, SpectrumOptions};
use serde_json::json;

fn full_chain() -> serde_json::Value {
    json!({
        "nodes": [
            {"id": "gen", "type": "ToneGenerator", "config": {"ppm_error": 200}},
            {"id": "fix", "type": "Reconstructor", "config": {"policy": "resample"}},
            {"id": "err", "type": "ErrorProbe"},
            {"id": "fft", "type": "Spectrum Analyzer", "config": {"window": "hann"}},
            {"id": "log", "type": "Summary", "config": {"label": "Test"}}
        ],
        "connections": [
            {"from": "gen", "to": "fix"},
            {"from": "fix", "to": "err"},
            {"from": "err", "to": "fft"},
            {"from": "fft", "to": "log"}
        ]
    })
}

#[test]
fn test_pipeline_creation() {
    let pipeline = Pipeline::from_json(full_chain()).unwrap();
    assert_eq!(pipeline.stage_ids(), vec!["gen", "fix", "err", "fft", "log"]);
    assert_eq!(pipeline.len(), 5);
}

#[test]
fn test_connection_order_wins_over_declaration_order() {
    let config = json!({
        "nodes": [
            {"id": "fix", "type": "reconstructor"},
            {"id": "gen", "type": "tonegenerator"}
        ],
        "connections": [{"from": "gen", "to": "fix"}]
    });
    let pipeline = Pipeline::from_json(config).unwrap();
    assert_eq!(pipeline.stage_ids(), vec!["gen", "fix"]);
}

#[test]
fn test_pipeline_execute() {
    let mut pipeline = Pipeline::from_json(full_chain()).unwrap();
    let frame = pipeline.execute_once().unwrap();

    assert_eq!(frame.sequence_id, 0);
    assert_eq!(frame.channel(channels::CORRECTED).unwrap().len(), 50);
    assert_eq!(frame.channel(channels::FREQ_HZ).unwrap().len(), 25);
    assert_eq!(frame.metadata["policy"], "resample");
    assert!(frame.meta_f64("max_abs_error").unwrap().is_finite());

    let second = pipeline.execute_once().unwrap();
    assert_eq!(second.sequence_id, 1);
    assert_eq!(second.channels, frame.channels);
}

#[test]
fn test_single_stage_pipeline_without_connections() {
    let config = json!({
        "nodes": [{"id": "gen", "type": "ToneGenerator", "config": {}}]
    });
    let mut pipeline = Pipeline::from_json(config).unwrap();
    let frame = pipeline.execute_once().unwrap();
    assert_eq!(frame.channels.len(), 4);
}

#[test]
fn test_unknown_stage_type() {
    let config = json!({
        "nodes": [{"id": "gain", "type": "Gain"}]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("Unknown stage type: Gain"));
}

#[test]
fn test_invalid_stage_config_is_reported_at_build() {
    let config = json!({
        "nodes": [{"id": "gen", "type": "ToneGenerator", "config": {"nominal_rate": 0.0}}]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("Failed to configure stage 'gen'"));
    assert!(format!("{:#}", err).contains("nominal_rate"));
}

#[test]
fn test_float_ppm_reaches_the_frame() {
    let config = json!({
        "nodes": [{"id": "gen", "type": "ToneGenerator", "config": {"ppm_error": 0.0}}]
    });
    let mut pipeline = Pipeline::from_json(config).unwrap();
    let frame = pipeline.execute_once().unwrap();
    assert_eq!(frame.metadata["ppm_error"], "0");
}

#[test]
fn test_mistyped_stage_parameter_fails_build() {
    let config = json!({
        "nodes": [{"id": "gen", "type": "ToneGenerator", "config": {"duration": "1e-6"}}]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(format!("{:#}", err).contains("Parameter 'duration' must be a number"));
}

#[test]
fn test_missing_nodes_array() {
    let err = Pipeline::from_json(json!({ "connections": [] })).err().unwrap();
    assert!(err.to_string().contains("missing nodes"));
}

#[test]
fn test_duplicate_stage_ids() {
    let config = json!({
        "nodes": [
            {"id": "gen", "type": "ToneGenerator"},
            {"id": "gen", "type": "Summary"}
        ],
        "connections": []
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("Duplicate stage id"));
}

#[test]
fn test_connection_to_unknown_stage() {
    let config = json!({
        "nodes": [{"id": "gen", "type": "ToneGenerator"}],
        "connections": [{"from": "gen", "to": "nowhere"}]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("unknown stage: nowhere"));
}

#[test]
fn test_rejects_two_sources() {
    let config = json!({
        "nodes": [
            {"id": "a", "type": "ToneGenerator"},
            {"id": "b", "type": "ToneGenerator"},
            {"id": "log", "type": "Summary"}
        ],
        "connections": [{"from": "a", "to": "log"}]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("exactly one source"));
}

#[test]
fn test_rejects_fan_out() {
    let config = json!({
        "nodes": [
            {"id": "gen", "type": "ToneGenerator"},
            {"id": "a", "type": "Summary"},
            {"id": "b", "type": "Summary"}
        ],
        "connections": [
            {"from": "gen", "to": "a"},
            {"from": "gen", "to": "b"}
        ]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("more than one outgoing"));
}

#[test]
fn test_rejects_cycle() {
    let config = json!({
        "nodes": [
            {"id": "a", "type": "Summary"},
            {"id": "b", "type": "Summary"}
        ],
        "connections": [
            {"from": "a", "to": "b"},
            {"from": "b", "to": "a"}
        ]
    });
    let err = Pipeline::from_json(config).err().unwrap();
    assert!(err.to_string().contains("no source stage"));
}

#[test]
fn test_failing_stage_aborts_run() {
    // Reconstructor first: the frame has no generated channels yet
    let config = json!({
        "nodes": [
            {"id": "fix", "type": "Reconstructor"},
            {"id": "log", "type": "Summary"}
        ],
        "connections": [{"from": "fix", "to": "log"}]
    });
    let mut pipeline = Pipeline::from_json(config).unwrap();
    let err = pipeline.execute_once().unwrap_err();
    assert!(err.to_string().contains("Stage 'fix' failed"));

    let collector = pipeline.monitor().collector().clone();
    assert_eq!(collector.get_stage_metrics("fix").unwrap().errors_count(), 1);
    assert_eq!(collector.get_stage_metrics("log").unwrap().runs(), 0);
}

#[test]
fn test_mismatch_chain() {
    let config = MismatchConfig::default().with_ppm_error(-300);
    let mut pipeline = Pipeline::mismatch_chain(&config, &SpectrumOptions::default()).unwrap();
    assert_eq!(
        pipeline.stage_ids(),
        vec!["generator", "reconstructor", "error_probe", "spectrum"]
    );

    let frame = pipeline.execute_once().unwrap();
    assert_eq!(frame.meta_f64("ppm_error").unwrap(), -300.0);
    assert_eq!(frame.meta_f64("reference_peak_hz").unwrap(), 200e6);
    assert_eq!(frame.meta_f64("corrected_peak_hz").unwrap(), 200e6);

    let report = pipeline.monitor().generate_report();
    assert!(report.contains("[generator]"));
    assert!(report.contains("Runs: 1"));
}

#[test]
fn test_mismatch_chain_rejects_invalid_config() {
    let config = MismatchConfig {
        duration: -1.0,
        ..MismatchConfig::default()
    };
    assert!(Pipeline::mismatch_chain(&config, &SpectrumOptions::default()).is_err());
}
