use probmap::config::ThresholdParams;
use probmap::error::ProbMapError;
use probmap::thresholds::{generate, precision_for, Threshold};
use rstest::rstest;

fn values(ts: &[Threshold]) -> Vec<f64> {
    ts.iter().map(|t| t.value()).collect()
}

#[rstest]
// Lower bound reached exactly by subtraction is excluded.
#[case(1.0, 0.75, 0.05, vec![1.0, 0.95, 0.9, 0.85, 0.8])]
#[case(1.0, 1.0, 0.05, vec![1.0])]
#[case(0.5, 0.2, 0.1, vec![0.5, 0.4, 0.3])]
#[case(1.0, 0.98, 0.005, vec![1.0, 0.995, 0.99, 0.985])]
#[case(2.0, 1.0, 0.5, vec![2.0, 1.5])]
#[case(10.0, 4.0, 2.0, vec![10.0, 8.0, 6.0])]
fn test_generate_sequences(
    #[case] upper: f64,
    #[case] lower: f64,
    #[case] step: f64,
    #[case] expected: Vec<f64>,
) {
    let ts = generate(upper, lower, step).unwrap();
    assert_eq!(values(&ts), expected);
}

#[test]
fn test_default_sweep_formats_like_directory_names() {
    let ts = generate(1.0, 0.75, 0.05).unwrap();
    let names: Vec<String> = ts.iter().map(|t| t.dir_name()).collect();
    assert_eq!(
        names,
        vec!["thresh1.0", "thresh0.95", "thresh0.9", "thresh0.85", "thresh0.8"]
    );
}

#[test]
fn test_no_float_artifacts() {
    let ts = generate(1.0, 0.0, 0.05).unwrap();
    assert_eq!(ts.len(), 20);
    for t in &ts {
        let s = t.to_string();
        assert!(s.len() <= 4, "Threshold printed with drift: {}", s);
    }
}

#[rstest]
#[case(1.0, 0.75, 0.05, 2)]
#[case(1.0, 0.75, 0.005, 3)]
#[case(1.0, 0.0, 0.5, 2)]
#[case(250.0, 100.0, 10.0, 3)]
fn test_precision(#[case] upper: f64, #[case] lower: f64, #[case] step: f64, #[case] digits: u32) {
    assert_eq!(precision_for(upper, lower, step), digits);
}

#[rstest]
#[case(1.0, 0.75, 0.0)]
#[case(1.0, 0.75, -0.05)]
#[case(0.5, 0.75, 0.05)]
#[case(f64::NAN, 0.75, 0.05)]
// Steps and bounds needing more decimals than an f64 holds.
#[case(1.0, 0.5, 1e-320)]
#[case(1e300, 0.0, 1.0)]
#[case(18014398509481984.0, 18014398509481980.0, 1.0)]
// A step below the spacing of f64 at this magnitude repeats the same value.
#[case(1e14, 1e14 - 1.0, 0.001)]
fn test_invalid_ranges_are_config_errors(#[case] upper: f64, #[case] lower: f64, #[case] step: f64) {
    match generate(upper, lower, step) {
        Err(ProbMapError::Config(_)) => {}
        other => panic!("Expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_map_floor_extends_sweep_below_labels() {
    let params = ThresholdParams {
        low_threshold: 0.9,
        map_floor: Some(0.8),
        ..Default::default()
    };
    let ts = params.sequence().unwrap();
    assert_eq!(values(&ts), vec![1.0, 0.95, 0.9, 0.85]);

    let labeled: Vec<bool> = ts.iter().map(|t| params.labels(*t)).collect();
    assert_eq!(labeled, vec![true, true, true, false]);
}

#[test]
fn test_map_floor_above_low_threshold_rejected() {
    let params = ThresholdParams {
        map_floor: Some(0.8),
        low_threshold: 0.75,
        ..Default::default()
    };
    assert!(matches!(params.validate(), Err(ProbMapError::Config(_))));
}

#[test]
fn test_default_params_label_everything() {
    let params = ThresholdParams::default();
    let ts = params.sequence().unwrap();
    assert!(ts.iter().all(|t| params.labels(*t)));
}

#[test]
fn test_tiny_step_fails_validation() {
    let params = ThresholdParams {
        step: 1e-320,
        ..Default::default()
    };
    assert!(matches!(params.validate(), Err(ProbMapError::Config(_))));
}

#[test]
fn test_finest_supported_step_still_generates() {
    let ts = generate(1.0, 1.0 - 4e-14, 1e-14).unwrap();
    assert_eq!(ts.len(), 4);
    assert!(ts.windows(2).all(|w| w[0] > w[1]));
}
