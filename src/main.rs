//src/main.rs

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use frota::{
    config::{AppState, Config},
    handlers,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carrega o .env antes do logger para que RUST_LOG valha
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("frota=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new(&config);

    let frota_routes = Router::new()
        .route("/metricas", post(handlers::fleet::post_metricas))
        .route("/eventos/duracoes", post(handlers::fleet::post_duracoes))
        .route("/veiculos/datas", post(handlers::fleet::post_datas));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/frota", frota_routes)
        .with_state(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
