use std::sync::Arc;

use risklove::application::handlers::create_router;
use risklove::config::AnalysisConfig;
use risklove::domain::services::sentiment_analysis::SentimentAnalysisService;
use risklove::infrastructure::ProviderFactory;
use risklove::rate_limit::{create_rate_limiter, RateLimiterConfig};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "risklove=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AnalysisConfig::from_env();
    info!(
        markets = ?config.markets,
        lookback_months = config.lookback_months,
        weighting = ?config.weighting,
        aux_policy = ?config.aux_policy,
        "Risk-love sentiment server starting"
    );

    let providers = ProviderFactory::create(&config)?;
    let service = Arc::new(SentimentAnalysisService::from_config(
        &config,
        providers.history,
        providers.auxiliary,
    ));

    // Warm-up run so configuration problems show in the log before the first request
    match service.analyze_default().await {
        Ok(report) => {
            for entry in &report.entries {
                info!(
                    market = %entry.market.id,
                    score = entry.score(),
                    signal = entry.result.signal.name(),
                    "{} {}",
                    entry.result.band.icon(),
                    entry.result.label
                );
            }
        }
        Err(e) => warn!(error = %e, "Initial analysis failed"),
    }

    let api_limiter = create_rate_limiter(RateLimiterConfig::default());
    let app = create_router(service, Some(api_limiter));

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let server = axum::serve(listener, app);

    let shutdown_signal = async {
        let ctrl_c = async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C signal"),
                Err(e) => error!("Failed to install Ctrl+C handler: {}", e),
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    info!("Received SIGTERM signal");
                }
                Err(e) => error!("Failed to install SIGTERM handler: {}", e),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    };

    info!("Server started successfully. Press Ctrl+C to stop.");
    server.with_graceful_shutdown(shutdown_signal).await?;

    info!("Shutdown complete");
    Ok(())
}
