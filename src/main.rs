use clap::Parser;
use opscast::cli::{self, Cli, Commands};
use opscast::config::credentials::redact_credentials;
use opscast::errors::{ErrorCategory, OpscastError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.with_ansi(!cli.no_color).init();
    }

    let result = match cli.command {
        None => cli::run::handle_run(Default::default(), cli.quiet).await,
        Some(Commands::Run(args)) => cli::run::handle_run(args, cli.quiet).await,
        Some(Commands::Validate(args)) => cli::validate::handle_validate(args).await,
    };

    if let Err(e) = result {
        let secrets: Vec<String> = ["OPSCAST_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .collect();
        let secrets: Vec<&str> = secrets.iter().map(String::as_str).collect();
        eprintln!("Error: {}", redact_credentials(&e.to_string(), &secrets));
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &OpscastError) -> i32 {
    match e.classify().category {
        ErrorCategory::Configuration => 2,
        ErrorCategory::Output => 3,
        _ => 1,
    }
}
