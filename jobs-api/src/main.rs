use std::sync::Arc;

use axum::Router;
use config::Config;
use envconfig::Envconfig;
use eyre::Result;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use jobs_common::metrics::setup_metrics_routes;
use jobs_common::store::{MongoStore, PrintStore, SharedStore};

mod config;
mod handlers;

async fn shutdown() {
    let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
        .expect("failed to register SIGTERM handler");

    let mut interrupt = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .expect("failed to register SIGINT handler");

    tokio::select! {
        _ = term.recv() => {},
        _ = interrupt.recv() => {},
    };

    tracing::info!("Shutting down gracefully...");
}

async fn listen(app: Router, bind: String) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::init_from_env().expect("failed to load configuration from env");

    let store: SharedStore = if config.print_store {
        Arc::new(PrintStore {})
    } else {
        let mongodb = &config.mongodb;
        let store = MongoStore::new(
            mongodb.connection_string.as_str(),
            mongodb.database_name.as_str(),
            mongodb.collection_name.as_str(),
            mongodb.max_pool_size,
            mongodb.insert_timeout.0,
        )
        .await
        .expect("failed to initialize posting store");

        Arc::new(store)
    };

    let app = handlers::add_routes(
        Router::new(),
        store,
        config.max_body_size,
        config.concurrency_limit,
    );
    let app = setup_metrics_routes(app);

    match listen(app, config.bind()).await {
        Ok(_) => {}
        Err(e) => tracing::error!("failed to start jobs-api http server, {}", e),
    }
}
