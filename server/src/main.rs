use proforma_server::catalog::Catalog;
use proforma_server::config::Config;
use proforma_server::http::{create_router, AppState};
use proforma_server::quote::PricingRules;
use proforma_server::render::DocumentRenderer;
use proforma_server::services::PdfService;
use std::sync::Arc;
use std::time::SystemTime;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuración (.env incluido)
    let config = Config::from_env()?;

    // Logging setup
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},proforma_server=debug", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Proforma Server iniciando...");
    tracing::info!("   HTTP Addr: {}", config.http_addr);
    tracing::info!("   Chrome: {}", config.chrome_path.display());
    tracing::info!("   Headless: {}", config.headless);
    tracing::info!(
        "   Timeouts (ms): launch={} load={} print={}",
        config.launch_timeout_ms,
        config.load_timeout_ms,
        config.print_timeout_ms
    );

    // El catálogo es opcional: /export-pdf funciona sin él
    let catalog = match Catalog::load(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(
                "⚠️ Catálogo no disponible ({:?}): {}",
                config.catalog_path,
                e
            );
            Catalog::empty()
        }
    };

    let documents = DocumentRenderer::new(config.stylesheet_url.clone())?;
    let pdf = PdfService::new(
        config.browser_settings(),
        config.pdf_options(),
        config.pdf_filename.clone(),
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        pricing: PricingRules::DEFAULT,
        documents: Arc::new(documents),
        pdf: Arc::new(pdf),
        start_time: SystemTime::now(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("🌐 Servidor escuchando: http://{}", config.http_addr);
    tracing::info!("📋 Endpoints:");
    tracing::info!("   GET  /health");
    tracing::info!("   GET  /api/v1/catalog?q=");
    tracing::info!("   POST /api/v1/quote");
    tracing::info!("   POST /api/v1/quote/html");
    tracing::info!("   POST /api/v1/quote/pdf");
    tracing::info!("   POST /export-pdf");

    axum::serve(listener, app).await?;

    Ok(())
}
