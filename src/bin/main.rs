use std::{str::FromStr, sync::Arc, time::Duration};

use poem::listener::TcpListener;
use profile_service::{
    core::{
        db::{close_pool, init_pool},
        file_store::FileStore,
    },
    init_openapi_route,
    settings::get_config,
    AppState,
};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_config()?;

    let log_level = Level::from_str(&config.log_level).unwrap_or(Level::DEBUG);
    // Logging to File
    let file_appender = tracing_appender::rolling::daily("./logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(log_level)
        .init();

    // Logging to Console
    // tracing_subscriber::fmt().with_max_level(log_level).init();

    tracing::info!("using {} as environment variables", config.source());
    tracing::info!("run with config: {:?}", config);

    // Init Database Connection
    tracing::info!("Init Postgres connection on {}", config.database_url);
    let pool = init_pool(&config).await?;
    // Init File Store
    let file_store = FileStore::new(&config.upload_dir);
    tokio::fs::create_dir_all(file_store.root()).await?;
    tracing::info!("storing uploads in {}", file_store.root().display());
    // Init App State
    let app_state = Arc::new(AppState {
        db: pool,
        file_store,
    });

    let app = init_openapi_route(app_state.clone(), &config);
    tracing::info!("run server on {}:{}", config.host, config.port);
    poem::Server::new(TcpListener::bind(format!(
        "{}:{}",
        config.host, config.port
    )))
    .run_with_graceful_shutdown(
        app,
        async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        },
        Some(Duration::from_secs(10)),
    )
    .await?;

    close_pool(&app_state.db).await;
    Ok(())
}
