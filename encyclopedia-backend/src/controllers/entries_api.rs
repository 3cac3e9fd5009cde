//! Entries JSON API — read-only endpoints mirroring the HTML pages.
//!
//! Provides the entry listing with file metadata and raw entry content.
//! All mutations go through the HTML forms.

use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;

use crate::AppState;
use crate::entries::EntrySummary;

// --- List entries ---

#[derive(Debug, Serialize)]
struct ListEntriesResponse {
    success: bool,
    entries: Vec<EntrySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn list_entries(data: web::Data<AppState>) -> impl Responder {
    match data.store.list_summaries() {
        Ok(entries) => HttpResponse::Ok().json(ListEntriesResponse {
            success: true,
            entries,
            error: None,
        }),
        Err(e) => {
            log::error!("Failed to list entries: {}", e);
            HttpResponse::InternalServerError().json(ListEntriesResponse {
                success: false,
                entries: vec![],
                error: Some("Failed to list entries".to_string()),
            })
        }
    }
}

// --- Read entry ---

#[derive(Debug, Serialize)]
struct ReadEntryResponse {
    success: bool,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ReadEntryResponse {
    fn err(title: String, error: &str) -> Self {
        Self {
            success: false,
            title,
            content: None,
            size: None,
            error: Some(error.to_string()),
        }
    }
}

async fn read_entry(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let title = path.into_inner();

    match data.store.get_entry(&title) {
        Ok(Some(entry)) => HttpResponse::Ok().json(ReadEntryResponse {
            success: true,
            size: Some(entry.content.len()),
            title: entry.title,
            content: Some(entry.content),
            error: None,
        }),
        Ok(None) => HttpResponse::NotFound().json(ReadEntryResponse::err(title, "Entry not found")),
        Err(e) => {
            log::error!("Failed to read entry {:?}: {}", title, e);
            HttpResponse::InternalServerError()
                .json(ReadEntryResponse::err(title, "Failed to read entry"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/entries")
            .route("", web::get().to(list_entries))
            .route("/{title}", web::get().to(read_entry)),
    );
}
