use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bugrocket_server::config::Args;
use bugrocket_server::upstream::GeminiClient;
use bugrocket_server::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bugrocket_server=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let args = Args::parse();
    let api_key = args.api_key.clone().unwrap_or_else(|| {
        tracing::warn!("GOOGLE_GENERATIVE_AI_API_KEY is not set; chat requests will fail upstream");
        String::new()
    });

    let state = AppState {
        provider: Arc::new(GeminiClient::new(&args.api_base, &args.model, api_key)),
        max_duration: args.max_duration(),
        image_base: args.image_base.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&args.addr).await?;
    tracing::info!(addr = %args.addr, model = %args.model, "bugrocket-server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
