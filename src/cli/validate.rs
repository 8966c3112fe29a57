use crate::cli::commands::ValidateArgs;
use crate::config::{self, ConfigOverrides};
use crate::errors::OpscastError;

/// Parse the file and run the same resolution and checks as a real run.
pub async fn handle_validate(args: ValidateArgs) -> Result<(), OpscastError> {
    let config = config::load_config(Some(&args.config), &ConfigOverrides::default()).await?;
    println!("Configuration is valid: {}", args.config.display());
    println!(
        "  {} departments, {} metrics, {} days, horizon {} days, provider {}",
        config.generator.departments.len(),
        config.generator.metrics.len(),
        config.generator.days,
        config.forecast.horizon_days,
        config.llm.provider,
    );
    Ok(())
}
