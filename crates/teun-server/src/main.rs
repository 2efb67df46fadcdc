mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use teun_pipeline::DiscoveryPipeline;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = teun_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = teun_db::connect_pool_from_config(&config).await?;
    let applied = teun_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let blocklist = Arc::new(teun_core::resolve_blocklist(config.blocklist_path.as_deref())?);
    let pipeline = DiscoveryPipeline::from_app_config(&config, blocklist)?;
    if !pipeline.scanner().is_enabled() {
        tracing::warn!("no answer engine configured; competitor scans are disabled");
    }

    let app = build_app(
        AppState {
            pipeline: Arc::new(pipeline),
            pool: Some(pool),
        },
        default_rate_limit_state().with_trusted_proxies(config.trusted_proxies.clone()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "teun-server listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
