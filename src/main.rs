use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use twin_calendar::{load_data, router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&config.data_path).await;
    info!(
        "loaded {} tasks from {}",
        data.tasks.len(),
        config.data_path.display()
    );
    let app = router(AppState::new(config.data_path.clone(), data));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
