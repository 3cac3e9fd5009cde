//! Encyclopedia pages — index, entry view, search, create, edit, random.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use minijinja::context;
use serde::Deserialize;

use crate::AppState;
use crate::entries::{EntryError, SearchOutcome, search};
use crate::error::AppError;
use crate::forms::{self, EntryForm, FormError, Validation};
use crate::templates::entry_url;

/// Warning on the random page when there is nothing to pick from
pub const EMPTY_STORE_WARNING: &str = "There are no entries yet";

/// Largest new/edit form body accepted (actix defaults to 16 KiB)
pub const MAX_FORM_BYTES: usize = 4 * 1024 * 1024;

type PageResult = Result<HttpResponse, AppError>;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

fn redirect_to_entry(title: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, entry_url(title)))
        .finish()
}

fn render_index(data: &AppState, warning: Option<&str>) -> PageResult {
    let entries = data.store.list_entries()?;
    let body = data
        .templates
        .render("index.html", context! { entries => entries, warning => warning })?;
    Ok(html(body))
}

fn render_not_found(data: &AppState, title: &str) -> PageResult {
    let body = data
        .templates
        .render("not_found.html", context! { title => title })?;
    Ok(HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(body))
}

fn render_new_form(data: &AppState, form: &EntryForm, warning: Option<&str>, errors: &[FormError]) -> PageResult {
    let body = data.templates.render(
        "new.html",
        context! { form => form, warning => warning, errors => errors },
    )?;
    Ok(html(body))
}

fn render_edit_form(
    data: &AppState,
    original_title: &str,
    form: &EntryForm,
    warning: Option<&str>,
    errors: &[FormError],
) -> PageResult {
    let body = data.templates.render(
        "edit.html",
        context! {
            original_title => original_title,
            form => form,
            warning => warning,
            errors => errors,
        },
    )?;
    Ok(html(body))
}

// GET /
async fn index(data: web::Data<AppState>) -> PageResult {
    render_index(&data, None)
}

// GET /wiki/{title}
async fn view_entry(data: web::Data<AppState>, path: web::Path<String>) -> PageResult {
    let title = path.into_inner();

    match data.store.get_entry(&title)? {
        Some(entry) => {
            let body = data.templates.render(
                "entry.html",
                context! { title => entry.title, content => entry.content },
            )?;
            Ok(html(body))
        }
        None => render_not_found(&data, &title),
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

fn run_search(data: &AppState, query: &str) -> PageResult {
    let entries = data.store.list_entries()?;

    let (searched, results) = match search::search(query, &entries) {
        SearchOutcome::NoQuery => (false, Vec::new()),
        SearchOutcome::Exact(title) => return Ok(redirect_to_entry(&title)),
        SearchOutcome::Matches(results) => (true, results),
    };

    let body = data.templates.render(
        "search.html",
        context! { query => query.trim(), searched => searched, results => results },
    )?;
    Ok(html(body))
}

// GET /search/?q=
async fn search_get(data: web::Data<AppState>, query: web::Query<SearchQuery>) -> PageResult {
    run_search(&data, &query.q)
}

// POST /search/
async fn search_post(data: web::Data<AppState>, form: web::Form<SearchQuery>) -> PageResult {
    run_search(&data, &form.q)
}

// GET /new
async fn new_entry_form(data: web::Data<AppState>) -> PageResult {
    render_new_form(&data, &EntryForm::default(), None, &[])
}

// POST /new
async fn create_entry(data: web::Data<AppState>, form: web::Form<EntryForm>) -> PageResult {
    let form = form.into_inner();

    match form.validate_new(&data.store)? {
        Validation::Valid(clean) => match data.store.create_entry(&clean.title, &clean.content) {
            Ok(title) => Ok(redirect_to_entry(&title)),
            // Lost a race with another request creating the same title
            Err(EntryError::AlreadyExists(_)) => {
                let warning = forms::duplicate_warning(&clean.title);
                render_new_form(&data, &form, Some(&warning), &[])
            }
            Err(e) => Err(e.into()),
        },
        Validation::Duplicate(existing) => {
            log::debug!("[ENTRIES] Rejected new entry {:?}: {:?} exists", form.title, existing);
            let warning = forms::duplicate_warning(form.title.trim());
            render_new_form(&data, &form, Some(&warning), &[])
        }
        Validation::Invalid(errors) => {
            render_new_form(&data, &form, Some(forms::INVALID_FORM_WARNING), &errors)
        }
    }
}

// GET /edit/{title}
async fn edit_entry_form(data: web::Data<AppState>, path: web::Path<String>) -> PageResult {
    let title = path.into_inner();

    match data.store.get_entry(&title)? {
        Some(entry) => {
            let form = EntryForm::new(entry.title.clone(), entry.content);
            render_edit_form(&data, &entry.title, &form, None, &[])
        }
        None => render_not_found(&data, &title),
    }
}

// POST /edit/{title}
async fn update_entry(
    data: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<EntryForm>,
) -> PageResult {
    let original_title = path.into_inner();
    let form = form.into_inner();

    match form.validate_edit() {
        Validation::Valid(clean) => {
            let title = data.store.save_entry(&clean.title, &clean.content)?;
            Ok(redirect_to_entry(&title))
        }
        rejected => render_edit_form(
            &data,
            &original_title,
            &form,
            Some(forms::INVALID_FORM_WARNING),
            rejected.errors(),
        ),
    }
}

// GET /random
async fn random_entry(data: web::Data<AppState>) -> PageResult {
    let picked = data.store.random_entry(&mut rand::thread_rng())?;

    match picked {
        Some(title) => Ok(redirect_to_entry(&title)),
        None => render_index(&data, Some(EMPTY_STORE_WARNING)),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(MAX_FORM_BYTES))
        .route("/", web::get().to(index))
        .route("/wiki/{title}", web::get().to(view_entry))
        .service(
            web::resource(["/search/", "/search"])
                .route(web::get().to(search_get))
                .route(web::post().to(search_post)),
        )
        .service(
            web::resource("/new")
                .route(web::get().to(new_entry_form))
                .route(web::post().to(create_entry)),
        )
        .route("/random", web::get().to(random_entry))
        .service(
            web::resource("/edit/{title}")
                .route(web::get().to(edit_entry_form))
                .route(web::post().to(update_entry)),
        );
}
