use orgfunnel::{app, config::AppConfig, state::AppState};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "orgfunnel=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr();
    let state = AppState::init(config).await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(state.db.pool()).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let result = app::serve(app::build_app(state.clone()), &addr).await;
    state.db.close().await;
    result
}
