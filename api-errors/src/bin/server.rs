use api_errors::{
    config::{self, Config},
    rest, AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = config::get_configuration()?;
    tracing::info!(?config, "initialize config");
    let Config {
        application: app_config,
        projects: projects_config,
    } = config;

    let address = format!("{}:{}", app_config.host, app_config.port);
    let listener = tokio::net::TcpListener::bind(address).await?;
    let port = listener.local_addr()?.port();

    let state = AppState::new(app_config.auth_token, projects_config);

    tracing::info!("Listening on http://{}:{port}...", app_config.host);
    axum::serve(listener, rest::app(state)).await?;
    Ok(())
}
