mod api;
mod middleware;

use gotransit_metrolinx::MetrolinxClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = gotransit_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = MetrolinxClient::builder(&config.metrolinx_api_key, &config.metrolinx_base_url)
        .timeout_secs(config.metrolinx_timeout_secs)
        .connect_timeout_secs(config.metrolinx_connect_timeout_secs)
        .user_agent(&config.user_agent)
        .build()?;

    let app = build_app(AppState { client });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        env = %config.env,
        addr = %config.bind_addr,
        upstream = %config.metrolinx_base_url,
        "gotransit server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
