use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use portfolio_site::api::build_router;
use portfolio_site::config::AppConfig;
use portfolio_site::content::ContentLoader;
use portfolio_site::state::AppContext;
use portfolio_site::workers::run_repo_refresh;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Guard flushes the file writer on exit; keep it alive for the whole run.
    let _log_guard = init_tracing(&config);

    info!("Starting portfolio site");

    let content = ContentLoader::load(&config.content_path)
        .await
        .with_context(|| format!("Failed to load site content from {}", config.content_path.display()))?;
    info!(
        "Site content loaded: {} projects, {} recommendations",
        content.projects.len(),
        content.recommendations.len()
    );

    let context = AppContext::new(&config, content);
    info!(
        "Application context initialized (GitHub user: {:?})",
        context.showcase_service.username()
    );

    let app = build_router(context.clone(), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    // Start API server
    let api_server = tokio::spawn({
        let bind_addr = config.bind_addr;
        async move {
            info!("API server listening on {}", bind_addr);
            if let Err(e) = axum::serve(listener, app).await {
                error!("API server failed: {}", e);
            }
        }
    });

    // Start repository refresh worker
    let repo_refresh = tokio::spawn({
        let context = context.clone();
        let every = config.repo_refresh_interval;
        async move {
            if let Err(e) = run_repo_refresh(context, every).await {
                error!("Repository refresh worker error: {}", e);
            }
        }
    });

    info!("All services started successfully");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        _ = api_server => {
            info!("API server stopped");
        }
        _ = repo_refresh => {
            info!("Repository refresh worker stopped");
        }
    }

    info!("Shutting down...");

    Ok(())
}

fn init_tracing(config: &AppConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let stdout = if config.log_json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };

    let (file, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "portfolio-site.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer).boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout)
        .with(file)
        .init();

    guard
}
