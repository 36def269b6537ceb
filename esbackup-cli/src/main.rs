use anyhow::{Context, Result};
use clap::Parser;
use esbackup::config::LoggingConfig;
use esbackup::{BackupConfig, BackupRun, LogFormat, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "esbackup")]
#[command(about = "Back up Elasticsearch cluster configuration to a folder of JSON files")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ESBACKUP_CONFIG")]
    config: PathBuf,

    /// Exit with status 2 if any resource could not be fetched or written
    #[arg(long)]
    strict: bool,
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone()),
    );
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|f| f.parse::<LogFormat>().ok())
        .unwrap_or(config.format);

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{:<12} {:>8} {:>9}", "CATEGORY", "FILES", "FAILURES");
    println!("{}", "-".repeat(31));
    for report in &summary.categories {
        let failures = if report.aborted {
            format!("{}*", report.failures.len())
        } else {
            report.failures.len().to_string()
        };
        println!(
            "{:<12} {:>8} {:>9}",
            report.category,
            report.written.len(),
            failures
        );
    }
    if summary.categories.iter().any(|r| r.aborted) {
        println!("* listing failed, category skipped");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = BackupConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    init_logging(&config.logging);

    tracing::info!("Config file: {}", cli.config.display());

    let run = BackupRun::from_config(&config)?;
    let summary = run.run().await?;
    print_summary(&summary);

    if cli.strict && !summary.is_complete() {
        tracing::error!(
            "{} resources could not be backed up",
            summary.failure_count()
        );
        return Ok(ExitCode::from(2));
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["esbackup", "--config", "backup.toml", "--strict"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("backup.toml"));
        assert!(cli.strict);

        let cli = Cli::try_parse_from(["esbackup", "-c", "other.toml"]).unwrap();
        assert!(!cli.strict);
    }

    #[test]
    fn test_config_required() {
        // ESBACKUP_CONFIG would satisfy the requirement
        if std::env::var_os("ESBACKUP_CONFIG").is_none() {
            assert!(Cli::try_parse_from(["esbackup"]).is_err());
        }
    }
}
