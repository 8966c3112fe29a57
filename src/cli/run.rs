use crate::cli::commands::RunArgs;
use crate::config::{self, ConfigOverrides};
use crate::errors::OpscastError;
use crate::pipeline::PipelineOrchestrator;
use crate::reporting::summary::render_summary;
use tracing::info;

pub async fn handle_run(args: RunArgs, quiet: bool) -> Result<(), OpscastError> {
    let overrides = ConfigOverrides {
        output_dir: args.output.clone(),
        seed: args.seed,
        offline: args.offline,
    };
    let config = config::load_config(args.config.as_deref(), &overrides).await?;
    info!(
        departments = config.generator.departments.len(),
        days = config.generator.days,
        horizon = config.forecast.horizon_days,
        output = %config.output.directory.display(),
        "Starting efficiency analysis"
    );

    let orchestrator = PipelineOrchestrator::new(config)?.with_progress(!quiet);
    let outcome = orchestrator.run().await?;

    if !quiet {
        let files = outcome.files.all();
        println!("{}", render_summary(&outcome.report, &files, outcome.summary.total_duration_ms));
    }
    Ok(())
}
