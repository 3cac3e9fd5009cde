use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Instant;

mod config;
mod controllers;
mod entries;
mod error;
mod forms;
mod templates;

use config::Config;
use entries::EntryStore;
use templates::Templates;

pub struct AppState {
    pub config: Config,
    pub store: Arc<EntryStore>,
    pub templates: Arc<Templates>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config, store: Arc<EntryStore>, templates: Arc<Templates>) -> Self {
        Self {
            config,
            store,
            templates,
            started_at: Instant::now(),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Encyclopedia v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    log::info!("Using entries directory: {:?}", config.entries_dir);

    config::initialize_entries_dir(&config.entries_dir, &config::seed_entries_dir())?;

    let store = EntryStore::new(config.entries_dir.clone()).map_err(|e| {
        log::error!("Failed to open entry store: {}", e);
        std::io::Error::other(e)
    })?;

    let templates = Templates::new().map_err(|e| {
        log::error!("Failed to compile page templates: {}", e);
        std::io::Error::other(e)
    })?;

    let host = config.host.clone();
    let port = config.port;
    let static_dir = config.static_dir.clone();
    if !static_dir.is_dir() {
        log::warn!("Static directory {:?} not found, pages will be unstyled", static_dir);
    }

    let state = web::Data::new(AppState::new(config, Arc::new(store), Arc::new(templates)));

    log::info!("Listening on http://{}:{}", host, port);

    let server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::health::config)
            .configure(controllers::entries_api::config)
            .configure(controllers::wiki::config);

        if static_dir.is_dir() {
            app = app.service(Files::new("/static", static_dir.clone()));
        }

        app
    })
    .bind((host.as_str(), port))?
    .run();

    let server_handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop)
            .await
            .is_err()
        {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
