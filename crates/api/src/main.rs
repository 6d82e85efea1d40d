use diskview_api::{build_router, state::AppState};
use diskview_config::Settings;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "diskview_api=debug,diskview_services=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!("Starting diskview on {}:{}", settings.app.host, settings.app.port);
    info!(
        api_base_url = %settings.disk.api_base_url,
        cache_ttl_secs = settings.cache.ttl_secs,
        cache_capacity = settings.cache.capacity,
        oauth_configured = settings.oauth.credentials().is_some(),
        "Disk API config"
    );

    let app_state = AppState::new(settings.clone())?;
    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
