use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use release_registrar::ci::TravisClient;
use release_registrar::config::Config;
use release_registrar::effects::TracingInterpreter;
use release_registrar::github::OctocrabClient;
use release_registrar::server::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "release_registrar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(?config, "configuration loaded");

    let github = OctocrabClient::from_token(&config.bot_token, config.github_api_url.as_deref())
        .context("building GitHub client")?;
    let ci = TravisClient::new(reqwest::Client::new(), config.ci_api_url.clone());

    let addr = config.listen_addr;
    let state = AppState::new(
        config,
        TracingInterpreter::new(github),
        TracingInterpreter::new(ci),
    );
    let app = build_router(state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
