use std::sync::Arc;

use clap::{Parser, Subcommand};
use doorwatch::{
    config::AppConfig,
    detection::HttpDetectionSource,
    http_client::create_retryable_http_client,
    notification::ExpoPushNotifier,
    pipeline::AlertPipeline,
    registration,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the alert ingestion pipeline.
    Run {
        /// Directory containing app.yaml. Defaults to `configs`.
        #[arg(long)]
        config_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config_dir } => run_pipeline(config_dir.as_deref()).await?,
    }

    Ok(())
}

async fn run_pipeline(config_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = Arc::new(AppConfig::new(config_dir)?);
    tracing::debug!(
        detection_base_url = %config.detection_base_url,
        poll_interval_ms = ?config.poll_interval_ms,
        buffer_capacity = config.buffer_capacity,
        "Configuration loaded."
    );

    let http_client = Arc::new(create_retryable_http_client(
        &config.http_retry_config,
        config.request_timeout_secs,
    )?);

    // Token registration is a one-shot startup task; a failure degrades push
    // delivery but never blocks alert ingestion.
    if let Some(device_token) = config.device_token.as_deref() {
        match registration::register_device_token(
            &config.detection_base_url,
            &http_client,
            device_token,
        )
        .await
        {
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Device token registration failed; push delivery unavailable.")
            }
        }
    } else {
        tracing::warn!("No device token configured; alerts will not produce push notifications.");
    }

    let source = Arc::new(HttpDetectionSource::new(
        config.detection_base_url.clone(),
        Arc::clone(&http_client),
    )?);
    let notifier = Arc::new(ExpoPushNotifier::new(config.push_endpoint.clone(), http_client));

    let handle = AlertPipeline::new(Arc::clone(&config), source, notifier).start();
    tracing::info!("Alert pipeline started.");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping pipeline...");
    handle.stop().await;

    Ok(())
}
