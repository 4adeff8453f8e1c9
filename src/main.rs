use clap::Parser;
use pantry::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::Settings,
    db, Error, Result,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pantry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Migrate => {
            migrate(settings).await?;
        }
        Commands::Import { path } => {
            import_catalog(settings, path).await?;
        }
        Commands::Recommend { page } => {
            commands::recommend(&settings.server_url(), page).await?;
        }
        Commands::Missing { recipe } => {
            commands::missing(&settings.server_url(), &recipe).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting Pantry server");
    info!("Database: {}", settings.database.url);
    info!("Server: {}:{}", settings.server.host, settings.server.port);

    let pool = db::init_pool_with_config(&settings.database).await?;
    info!(
        "Database connection established (max_connections: {}, min_connections: {})",
        settings.database.max_connections, settings.database.min_connections
    );

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    // A broken catalog should not keep the server from starting
    if let Some(path) = &settings.catalog.path {
        match commands::import(&pool, path).await {
            Ok(report) if !report.errors.is_empty() => {
                warn!(
                    "{} recipe sync errors occurred - check logs for details",
                    report.errors.len()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "Failed to load recipe catalog from {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    let state = AppState {
        pool,
        settings: settings.clone(),
    };
    let app = routes::create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Pantry");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nAPI Endpoints:");
    println!("  POST /api/recommend");
    println!("  GET  /api/ingredients/:name/recipes");
    println!("  GET  /api/recipes/:name/missing");
    println!("  GET  /api/pantry");
    println!("  GET  /api/shopping-list");
    println!("  GET  /api/stats");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn migrate(settings: Settings) -> Result<()> {
    info!("Running database migrations");

    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed successfully");
    Ok(())
}

async fn import_catalog(settings: Settings, path: PathBuf) -> Result<()> {
    let pool = db::init_pool(&settings.database.url).await?;
    db::run_migrations(&pool).await?;

    let report = commands::import(&pool, &path).await?;

    println!(
        "✓ Imported {}: {} added, {} updated, {} unchanged",
        path.display(),
        report.added,
        report.updated,
        report.unchanged
    );
    if !report.errors.is_empty() {
        println!("  {} recipes failed, see the log for details", report.errors.len());
    }

    Ok(())
}
