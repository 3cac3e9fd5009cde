//! Liveness and store status for monitoring.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::AppState;

const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    entry_count: usize,
}

#[derive(Debug, Serialize)]
struct StoreStatusResponse {
    listen_addr: String,
    entries_dir: String,
    entries_dir_exists: bool,
    entry_count: usize,
    uptime_secs: u64,
}

// GET /api/health
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: CRATE_VERSION,
        entry_count: state.store.len(),
    })
}

// GET /api/health/config
async fn store_status(state: web::Data<AppState>) -> HttpResponse {
    let entries_dir = state.store.entries_dir();

    HttpResponse::Ok().json(StoreStatusResponse {
        listen_addr: format!("{}:{}", state.config.host, state.config.port),
        entries_dir: entries_dir.to_string_lossy().into_owned(),
        entries_dir_exists: entries_dir.is_dir(),
        entry_count: state.store.len(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/health")
            .route("", web::get().to(health))
            .route("/config", web::get().to(store_status)),
    );
}
