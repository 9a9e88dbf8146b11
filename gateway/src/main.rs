use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridrisk_gateway::{build_router, AppState, GatewayConfig, SiteAnalyzer};
use risk_scoring::LocationScorer;
use site_report::PrintPdfEngine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gridrisk_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::parse();

    let store_config = config.store_config();
    let store = site_store::open_store(&store_config)?;
    tracing::info!("   Site store: {} ({:?})", store_config.location, store_config.mode);

    let analyzer = SiteAnalyzer::new(
        Arc::new(LocationScorer::default()),
        store,
        Arc::new(PrintPdfEngine),
    );

    let app = build_router(AppState { analyzer })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    tracing::info!("GridRisk gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
