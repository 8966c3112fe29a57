use std::io::Write;

use opscast::config::{load_config, ConfigOverrides, RESOURCE_UTILIZATION};
use opscast::errors::OpscastError;
use tempfile::NamedTempFile;

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_file_values_and_cli_overrides() {
    let file = yaml_file(
        r#"
generator:
  departments: [Finance, Legal]
  days: 120
  anomaly_rate: 0.05
  seed: 11
forecast:
  horizon_days: 30
  metrics: [resource_utilization]
output:
  directory: ./from-file
"#,
    );
    let overrides = ConfigOverrides {
        output_dir: Some("./from-cli".into()),
        seed: Some(99),
        offline: true,
    };
    let config = load_config(Some(file.path()), &overrides).await.unwrap();

    assert_eq!(config.generator.departments, vec!["Finance", "Legal"]);
    assert_eq!(config.generator.days, 120);
    assert_eq!(config.generator.seed, Some(99));
    assert_eq!(config.forecast.horizon_days, 30);
    assert!(config.forecast.includes(RESOURCE_UTILIZATION));
    assert!(!config.forecast.includes("staff_hours"));
    assert_eq!(config.output.directory, std::path::PathBuf::from("./from-cli"));
    assert!(config.llm.offline);
    assert!(!config.llm.is_configured());
}

#[tokio::test]
async fn test_out_of_range_rate_is_config_error() {
    let file = yaml_file("generator:\n  anomaly_rate: 2.0\n");
    let err = load_config(Some(file.path()), &ConfigOverrides::default()).await.unwrap_err();
    assert!(matches!(err, OpscastError::Config(_)));
}

#[tokio::test]
async fn test_missing_file_is_config_error() {
    let err = load_config(Some(std::path::Path::new("/nonexistent/opscast.yaml")), &ConfigOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err, OpscastError::Config(_)));
}

#[tokio::test]
async fn test_malformed_yaml_is_config_error() {
    let file = yaml_file("generator: [unclosed\n");
    let err = load_config(Some(file.path()), &ConfigOverrides::default()).await.unwrap_err();
    assert!(matches!(err, OpscastError::Config(_)));
}
