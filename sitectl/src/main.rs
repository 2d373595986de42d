use clap::Parser;
use sitectl::config::Command;
use sitectl::{Application, Config, connect_pool, geo, stats_aggregator, telemetry};

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// One recompute, report printed to stdout. Partial write failures still exit 0.
async fn recompute(config: Config) -> anyhow::Result<()> {
    let pool = connect_pool(&config.database).await?;
    let result = stats_aggregator(pool.clone(), &config).run().await;
    pool.close().await;

    let report = result?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_complete() {
        tracing::warn!("{} of {} worker writes failed", report.failed.len(), report.processed);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before anything else that might build a TLS client
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Parse CLI args
    let args = sitectl::config::Args::parse();

    // Distance needs neither configuration nor a database
    if let Some(Command::Distance { lat1, lng1, lat2, lng2 }) = args.command {
        println!("{}", geo::format_distance(geo::distance_km(lat1, lng1, lat2, lng2)));
        return Ok(());
    }

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    // Initialize telemetry (tracing + optional OpenTelemetry)
    telemetry::init_telemetry(config.enable_otel_export)?;

    tracing::debug!("{:?}", args);

    match args.command.unwrap_or(Command::Serve) {
        Command::Recompute => {
            let result = recompute(config).await;
            telemetry::shutdown_telemetry();
            result
        }
        // Handled above
        Command::Distance { .. } => Ok(()),
        Command::Serve => {
            // Run the application with graceful shutdown on SIGTERM/Ctrl+C
            let shutdown = shutdown_signal();
            Application::new(config).await?.serve(shutdown).await
        }
    }
}
