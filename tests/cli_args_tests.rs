use clap::Parser;
use clockskew::args::Args;
use clockskew::dsp::Window;
use clockskew::{Band, ReconstructionPolicy};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults_give_standard_scenario() {
    let args = Args::try_parse_from(["clockskew"]).unwrap();
    let config = args.mismatch_config().unwrap();

    assert_eq!(config.ppm_error, 200);
    assert_eq!(config.policy, ReconstructionPolicy::Interpolate);
    assert_eq!(args.spectrum_options().window, Window::Rectangular);
    assert!(args.spectrum_options().band.is_none());
    assert!(!args.json);
}

#[test]
fn test_flags_override_values() {
    let args = Args::try_parse_from([
        "clockskew",
        "--ppm-error",
        "-120",
        "--policy",
        "resample",
        "--window",
        "hann",
        "--band-center-hz",
        "2e8",
        "--band-half-width-hz",
        "5e7",
    ])
    .unwrap();

    let config = args.mismatch_config().unwrap();
    assert_eq!(config.ppm_error, -120);
    assert_eq!(config.policy, ReconstructionPolicy::Resample);

    let options = args.spectrum_options();
    assert_eq!(options.window, Window::Hann);
    assert_eq!(
        options.band,
        Some(Band {
            center_hz: 2e8,
            half_width_hz: 5e7
        })
    );
}

#[test]
fn test_flags_override_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "ppm_error": 50, "duration": 1e-7 }}"#).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let args = Args::try_parse_from(["clockskew", "--config", &path, "--ppm-error", "75"]).unwrap();
    let config = args.mismatch_config().unwrap();

    assert_eq!(config.ppm_error, 75);
    assert_eq!(config.duration, 1e-7);
}

#[test]
fn test_invalid_values_fail_validation() {
    let args = Args::try_parse_from(["clockskew", "--f-signal", "3e9"]).unwrap();
    assert!(args.mismatch_config().is_err());

    assert!(Args::try_parse_from(["clockskew", "--policy", "cubic"]).is_err());
}

#[test]
fn test_band_flags_require_each_other() {
    assert!(Args::try_parse_from(["clockskew", "--band-center-hz", "2e8"]).is_err());
}

#[test]
fn test_pipeline_conflicts_with_scenario_flags() {
    assert!(Args::try_parse_from(["clockskew", "--pipeline", "p.json", "--ppm-error", "5"]).is_err());

    let args = Args::try_parse_from(["clockskew", "--pipeline", "p.json", "--json"]).unwrap();
    assert!(args.json);
    assert!(args.pipeline.is_some());
}
