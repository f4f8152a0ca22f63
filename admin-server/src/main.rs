use admin_server::api::build_app;
use admin_server::{BoxError, Config, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Admin server starting"
    );
    if config.is_development() {
        tracing::warn!("Development mode: missing secrets fall back to built-in defaults");
    }

    let state = ServerState::initialize(&config).await?;
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
