use anyhow::anyhow;
use codefolio::{config::Config, db, routes, state::AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env file immediately. Silently ignored if there isn't one.
    dotenvy::dotenv().ok();

    // 1. Sentry, only if SENTRY_DSN is set. The guard must outlive the server.
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        traces_sample_rate: 1.0,
        ..Default::default()
    }));

    // 2. rustls needs a process-wide crypto provider before the DB connects.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    // 3. Config. Everything downstream gets it passed in, nothing else reads env.
    let config = Config::from_env()?;

    // 4. Logging. RUST_LOG wins; otherwise request tracing only in dev.
    let default_filter = if config.dev_mode {
        "codefolio=debug,tower_http=debug"
    } else {
        "codefolio=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    tracing::info!("Starting Codefolio API...");

    // 5. Database, migrations included
    let pool = db::connect(&config.database_url).await?;
    tracing::info!("Connected to PostgreSQL");

    let state = AppState::new(
        db::PgStore::new(pool),
        config.security.clone(),
        config.page_limits,
    );
    let app = routes::create_routes(state);

    // 6. Serve on all interfaces (needed inside Docker)
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
