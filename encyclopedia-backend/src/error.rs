use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::entries::EntryError;
use crate::templates::ERROR_PAGE;

/// Failures that end a page request with a generic error page
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] EntryError),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("Request failed: {}", self);
        HttpResponse::build(self.status_code())
            .content_type(ContentType::html())
            .body(ERROR_PAGE)
    }
}
