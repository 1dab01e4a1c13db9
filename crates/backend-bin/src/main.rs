use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use backend_lib::{
    config::{Settings, DEV_TOKEN_SECRET},
    dataset,
    router,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration; missing config is fatal at startup
    let config = Settings::load().or_else(|_| {
        tracing::info!("trying to load config from config/default.toml");
        Settings::load_from("config/default.toml")
    })?;

    // Initialize tracing from the configured log level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    if config.token_secret == DEV_TOKEN_SECRET {
        tracing::warn!("running with the development token secret; set BOOKSHELF_TOKEN_SECRET");
    }

    // Create application state
    let state = AppState::new(config.clone());

    // Seed the catalog when a dataset is configured; an unreadable dataset
    // aborts startup
    if let Some(path) = &config.dataset_path {
        let report = dataset::seed(path, state.books.as_ref(), state.users.as_ref())
            .await
            .with_context(|| format!("seeding dataset from {}", path.display()))?;
        tracing::info!(books = report.books, users = report.users, "catalog seeded");
    }

    // Create the router
    let app = router::create_router(state);

    // Start the server
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
