use opscast::config::{GeneratorConfig, MetricProfile, RESOURCE_UTILIZATION, STAFF_HOURS};
use opscast::generator::generate;

fn single_series(days: u32, rate: f64) -> GeneratorConfig {
    GeneratorConfig {
        departments: vec!["Ops".to_string()],
        metrics: vec![MetricProfile::new(STAFF_HOURS, 80.0, 10.0, 1.0)],
        days,
        anomaly_rate: rate,
        ..Default::default()
    }
}

#[test]
fn test_anomaly_rate_converges() {
    let data = generate(&single_series(20_000, 0.1), 12345).unwrap();
    let observed = data.anomaly_count() as f64 / data.records.len() as f64;
    assert!((observed - 0.1).abs() <= 0.01, "observed rate {}", observed);
}

#[test]
fn test_default_shape() {
    let config = GeneratorConfig::default();
    let data = generate(&config, 1).unwrap();
    assert_eq!(data.records.len(), 5 * 4 * 365);
    assert_eq!(data.window.end(), chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    assert!(data
        .records
        .iter()
        .filter(|r| r.metric_name == RESOURCE_UTILIZATION)
        .all(|r| (0.0..=100.0).contains(&r.value)));
}

#[test]
fn test_seed_reproducibility() {
    let config = single_series(90, 0.05);
    let a = generate(&config, 99).unwrap();
    let b = generate(&config, 99).unwrap();
    let c = generate(&config, 100).unwrap();
    assert_eq!(a.records, b.records);
    assert_ne!(a.records, c.records);
}
