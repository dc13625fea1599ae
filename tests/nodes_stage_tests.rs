use clockskew::core::{channels, ProcessingStage, SignalFrame};
use clockskew::nodes::{ChannelStats, ErrorProbe, Reconstructor, SpectrumAnalyzer, Summary, TimeWindow, ToneGenerator};
use clockskew::{MismatchConfig, ReconstructionPolicy};
use serde_json::json;

fn generated(config: serde_json::Value) -> SignalFrame {
    let mut generator = ToneGenerator::default();
    generator.on_create(config).unwrap();
    generator.process(SignalFrame::new(0)).unwrap()
}

fn corrected(frame: SignalFrame, policy: &str) -> SignalFrame {
    let mut reconstructor = Reconstructor::default();
    reconstructor.on_create(json!({ "policy": policy })).unwrap();
    reconstructor.process(frame).unwrap()
}

#[test]
fn test_tone_generator_writes_channels_and_metadata() {
    let frame = generated(json!({ "ppm_error": 200 }));

    assert_eq!(frame.channel(channels::T_NOMINAL).unwrap().len(), 50);
    assert_eq!(frame.channel(channels::REFERENCE).unwrap().len(), 50);
    assert_eq!(frame.channel(channels::T_MISMATCH).unwrap().len(), 51);
    assert_eq!(frame.channel(channels::MISMATCHED).unwrap().len(), 51);

    assert_eq!(frame.meta_f64("f_signal").unwrap(), 200e6);
    assert_eq!(frame.meta_f64("nominal_rate").unwrap(), 2e9);
    assert_eq!(frame.meta_f64("ppm_error").unwrap(), 200.0);
    assert!((frame.meta_f64("actual_rate").unwrap() - 2.0004e9).abs() < 1.0);
}

#[test]
fn test_tone_generator_rejects_invalid_config_at_creation() {
    let mut generator = ToneGenerator::default();
    assert!(generator.on_create(json!({ "f_signal": 1.5e9 })).is_err());

    let mut generator = ToneGenerator::default();
    assert!(generator.on_create(json!({ "ppm_error": 5_000_000_000i64 })).is_err());
}

#[test]
fn test_tone_generator_from_config_round_trips() {
    let config = MismatchConfig::default().with_ppm_error(-75);
    let generator = ToneGenerator::from_config(&config).unwrap();
    assert_eq!(generator.config(), config);
}

#[test]
fn test_tone_generator_from_config_validates() {
    let config = MismatchConfig {
        nominal_rate: -2e9,
        ..MismatchConfig::default()
    };
    assert!(ToneGenerator::from_config(&config).is_err());
}

#[test]
fn test_tone_generator_accepts_integral_float_ppm() {
    let mut generator = ToneGenerator::default();
    generator.on_create(json!({ "ppm_error": 100.0 })).unwrap();
    assert_eq!(generator.ppm_error, 100);

    let frame = generated(json!({ "ppm_error": 0.0 }));
    assert_eq!(frame.metadata["ppm_error"], "0");
    assert_eq!(frame.channel(channels::MISMATCHED).unwrap().len(), 50);
}

#[test]
fn test_tone_generator_rejects_mistyped_parameters() {
    for config in [
        json!({ "ppm_error": 100.5 }),
        json!({ "ppm_error": "100" }),
        json!({ "duration": "1e-6" }),
        json!({ "f_signal": true }),
        json!({ "ppm": 100 }),
        json!([100]),
    ] {
        let mut generator = ToneGenerator::default();
        assert!(generator.on_create(config.clone()).is_err(), "{} accepted", config);
        assert_eq!(generator.config(), MismatchConfig::default());
    }
}

#[test]
fn test_other_stages_reject_mistyped_parameters() {
    assert!(SpectrumAnalyzer::default().on_create(json!({ "floor": "tiny" })).is_err());
    assert!(SpectrumAnalyzer::default().on_create(json!({ "window": 1 })).is_err());
    assert!(SpectrumAnalyzer::default()
        .on_create(json!({ "band_center_hz": "200e6", "band_half_width_hz": 1e6 }))
        .is_err());
    assert!(TimeWindow::default().on_create(json!({ "cycles": "1.5" })).is_err());
    assert!(Summary::default().on_create(json!({ "label": 7 })).is_err());
    assert!(Reconstructor::default().on_create(json!({ "mode": "resample" })).is_err());
    assert!(ErrorProbe.on_create(json!({ "scale": 2.0 })).is_err());

    // Null values and absent configs keep the defaults
    assert!(TimeWindow::default().on_create(json!({ "cycles": null })).is_ok());
    assert!(ErrorProbe.on_create(serde_json::Value::Null).is_ok());
}

#[test]
fn test_reconstructor_aligns_to_nominal_grid() {
    for policy in ["interpolate", "resample"] {
        let frame = corrected(generated(json!({})), policy);
        assert_eq!(frame.channel(channels::CORRECTED).unwrap().len(), 50);
        assert_eq!(frame.metadata["policy"], policy);
    }
}

#[test]
fn test_reconstructor_rejects_unknown_policy() {
    let mut reconstructor = Reconstructor::default();
    assert!(reconstructor.on_create(json!({ "policy": "cubic" })).is_err());
    assert!(reconstructor.on_create(json!({ "policy": 3 })).is_err());
    assert_eq!(reconstructor.policy, ReconstructionPolicy::Interpolate);
}

#[test]
fn test_reconstructor_needs_generated_channels() {
    let mut reconstructor = Reconstructor::default();
    let err = reconstructor.process(SignalFrame::new(0)).unwrap_err();
    assert!(err.to_string().contains("t_nominal"));
}

#[test]
fn test_error_probe_zero_for_zero_ppm() {
    let frame = corrected(generated(json!({ "ppm_error": 0 })), "interpolate");
    let frame = ErrorProbe.process(frame).unwrap();

    assert!(frame.meta_f64("max_abs_error").unwrap() < 1e-12);
    assert!(frame.meta_f64("rms_error").unwrap() < 1e-12);
}

#[test]
fn test_spectrum_analyzer_band_and_peaks() {
    let frame = corrected(generated(json!({})), "interpolate");

    let mut analyzer = SpectrumAnalyzer::default();
    analyzer
        .on_create(json!({ "band_center_hz": 200e6, "band_half_width_hz": 50e6 }))
        .unwrap();
    let frame = analyzer.process(frame).unwrap();

    // 40 MHz bins: 160, 200 and 240 MHz
    assert_eq!(frame.channel(channels::FREQ_HZ).unwrap().len(), 3);
    assert_eq!(frame.channel(channels::CORRECTED_DB).unwrap().len(), 3);
    assert_eq!(frame.meta_f64("reference_peak_hz").unwrap(), 200e6);
}

#[test]
fn test_spectrum_analyzer_empty_band_leaves_peaks_unset() {
    let frame = corrected(generated(json!({})), "interpolate");

    let mut analyzer = SpectrumAnalyzer::default();
    analyzer
        .on_create(json!({ "band_center_hz": 210e6, "band_half_width_hz": 1e6 }))
        .unwrap();
    let frame = analyzer.process(frame).unwrap();

    assert!(frame.channel(channels::FREQ_HZ).unwrap().is_empty());
    assert!(!frame.metadata.contains_key("reference_peak_hz"));
}

#[test]
fn test_spectrum_analyzer_requires_both_band_fields() {
    let mut analyzer = SpectrumAnalyzer::default();
    assert!(analyzer.on_create(json!({ "band_center_hz": 200e6 })).is_err());

    let mut analyzer = SpectrumAnalyzer::default();
    assert!(analyzer.on_create(json!({ "window": "blackman" })).is_err());
}

#[test]
fn test_time_window_keeps_first_cycles() {
    let frame = corrected(generated(json!({})), "interpolate");

    let mut window = TimeWindow::default();
    window.on_create(json!({ "cycles": 1.5 })).unwrap();
    let frame = window.process(frame).unwrap();

    // 1.5 periods of 200 MHz at 2 GS/s
    for name in [
        channels::T_NOMINAL,
        channels::REFERENCE,
        channels::T_MISMATCH,
        channels::MISMATCHED,
        channels::CORRECTED,
    ] {
        assert_eq!(frame.channel(name).unwrap().len(), 15, "{}", name);
    }
    assert_eq!(frame.metadata["window_samples"], "15");
}

#[test]
fn test_time_window_rejects_non_positive_cycles() {
    let mut window = TimeWindow::default();
    assert!(window.on_create(json!({ "cycles": 0.0 })).is_err());
    assert_eq!(window.cycles, 1.5);
}

#[test]
fn test_summary_passes_frame_through() {
    let frame = generated(json!({}));
    let before = ChannelStats::for_frame(&frame);

    let mut summary = Summary::default();
    summary.on_create(json!({ "label": "check" })).unwrap();
    let frame = summary.process(frame).unwrap();

    assert_eq!(summary.label, "check");
    assert_eq!(ChannelStats::for_frame(&frame), before);
}

#[test]
fn test_channel_stats() {
    let stats = ChannelStats::of("x", &[3.0, -3.0, 3.0, -3.0]);
    assert_eq!(stats.len, 4);
    assert_eq!(stats.mean, 0.0);
    assert_eq!(stats.rms, 3.0);

    let empty = ChannelStats::of("empty", &[]);
    assert_eq!((empty.mean, empty.rms), (0.0, 0.0));
}
