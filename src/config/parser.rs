use std::path::Path;
use crate::errors::OpscastError;
use super::types::FileConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::{debug, warn};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<FileConfig, OpscastError> {
    if !path.exists() {
        return Err(OpscastError::Config(format!("Config file not found: {}", path.display())));
    }

    let unreadable = |e: std::io::Error| {
        OpscastError::Config(format!("Cannot read config file {}: {}", path.display(), e))
    };

    let metadata = tokio::fs::metadata(path).await.map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(OpscastError::Config(format!("Config path is not a file: {}", path.display())));
    }
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(OpscastError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await.map_err(unreadable)?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<FileConfig, OpscastError> {
    // An empty file is a valid "all defaults" config
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| OpscastError::Config(format!("Invalid YAML: {}", e)))?;

    validate_schema(&yaml)?;

    let config: FileConfig = serde_yaml::from_value(yaml)
        .map_err(|e| OpscastError::Config(format!("Invalid config: {}", e)))?;
    debug!("Config file parsed");
    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
/// Violations are logged; range checks that matter are enforced after resolution.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), OpscastError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| OpscastError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| OpscastError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let result = parse_config(Path::new("/nonexistent/opscast.yaml")).await;
        assert!(matches!(result, Err(OpscastError::Config(_))));
    }

    #[tokio::test]
    async fn test_directory_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = parse_config(dir.path()).await;
        assert!(matches!(result, Err(OpscastError::Config(_))));
    }

    #[tokio::test]
    async fn test_non_utf8_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x9f]).unwrap();
        let result = parse_config(file.path()).await;
        assert!(matches!(result, Err(OpscastError::Config(_))));
    }

    #[tokio::test]
    async fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generator:\n  days: 60\n  seed: 7\nforecast:\n  horizon_days: 14").unwrap();
        let config = parse_config(file.path()).await.unwrap();
        assert_eq!(config.generator.as_ref().unwrap().days, Some(60));
        assert_eq!(config.generator.unwrap().seed, Some(7));
        assert_eq!(config.forecast.unwrap().horizon_days, Some(14));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config_str("  \n").unwrap();
        assert!(config.generator.is_none());
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        let result = parse_config_str("generator: [unclosed");
        assert!(matches!(result, Err(OpscastError::Config(_))));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result = parse_config_str("generator:\n  days: many\n");
        assert!(matches!(result, Err(OpscastError::Config(_))));
    }

    #[test]
    fn test_metric_profiles_parse() {
        let yaml = "generator:\n  metrics:\n    - name: tickets\n      base: 40\n      noise_sd: 4\n      min: 0\n";
        let config = parse_config_str(yaml).unwrap();
        let metrics = config.generator.unwrap().metrics.unwrap();
        assert_eq!(metrics[0].name, "tickets");
        assert_eq!(metrics[0].seasonal_scale, 1.0);
        assert_eq!(metrics[0].min, Some(0.0));
        assert_eq!(metrics[0].max, None);
    }
}
