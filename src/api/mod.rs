//! HTTP API
//!
//! Router assembly and shared request plumbing. Authentication wraps every
//! `/api` route except login; content routes add a role gate on top.

pub mod auth_routes;
pub mod jadwal;
pub mod jemaat;
pub mod keuangan;
pub mod middleware;
pub mod renungan;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{Request, State};
use axum::middleware::{from_fn, from_fn_with_state, Next};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::Role;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// Roles allowed into the content sections (jadwal, renungan, jemaat).
/// BENDAHARA is deliberately absent: the treasurer only sees keuangan.
pub const CONTENT_ROLES: &[Role] = &[Role::Sekretaris, Role::Admin];

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub config: Arc<Config>,
}

pub fn create_router(state: AppState) -> Router {
    let jadwal_routes = Router::new()
        .route("/", get(jadwal::list).post(jadwal::create))
        .route(
            "/:id",
            get(jadwal::detail)
                .put(jadwal::update)
                .delete(jadwal::remove),
        )
        .layer(from_fn(content_gate));

    let renungan_routes = Router::new()
        .route("/", get(renungan::list).post(renungan::create))
        .route(
            "/:id",
            get(renungan::detail)
                .put(renungan::update)
                .delete(renungan::remove),
        )
        .layer(from_fn(content_gate));

    let jemaat_routes = Router::new()
        .route("/", get(jemaat::list).post(jemaat::create))
        .route(
            "/:id",
            get(jemaat::detail)
                .put(jemaat::update)
                .delete(jemaat::remove),
        )
        .layer(from_fn(content_gate));

    // Static segments are registered ahead of `/:id` so `summary` and
    // `laporan` never resolve as transaction ids.
    let keuangan_routes = Router::new()
        .route("/summary", get(keuangan::summary))
        .route("/summary/bulanan", get(keuangan::summary_bulanan))
        .route("/laporan", get(keuangan::laporan))
        .route("/", get(keuangan::list).post(keuangan::create))
        .route(
            "/:id",
            get(keuangan::detail)
                .put(keuangan::update)
                .delete(keuangan::remove),
        );

    let protected = Router::new()
        .nest("/jadwal", jadwal_routes)
        .nest("/renungan", renungan_routes)
        .nest("/jemaat", jemaat_routes)
        .nest("/keuangan", keuangan_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let api = Router::new()
        .route("/auth/login", post(auth_routes::login))
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api)
        .nest_service(
            "/uploads",
            ServeDir::new(state.config.upload_dir.clone()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn content_gate(request: Request, next: Next) -> Result<axum::response::Response, AppError> {
    middleware::require_roles(CONTENT_ROLES, request, next).await
}

async fn root() -> &'static str {
    "Sistem Informasi Gereja - Backend Aktif"
}

async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.store.ping().await?;
    Ok("OK")
}

/// A multipart form flattened into text fields plus at most one file.
pub(crate) struct FormPayload {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

pub(crate) struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Drain a multipart body. Only the named part is treated as a file, and
/// only when the client actually attached one; everything else lands in the
/// text-field map.
pub(crate) async fn read_form(
    mut multipart: Multipart,
    file_field: &str,
) -> AppResult<FormPayload> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(part) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = part.name().unwrap_or_default().to_string();
        let file_name = part.file_name().map(str::to_string);

        match file_name {
            Some(original) if name == file_field && !original.is_empty() => {
                let bytes = part.bytes().await.map_err(bad_multipart)?;
                if !bytes.is_empty() {
                    file = Some(UploadedFile {
                        name: original,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {
                let value = part.text().await.map_err(bad_multipart)?;
                fields.insert(name, value);
            }
        }
    }

    Ok(FormPayload { fields, file })
}

fn bad_multipart(err: MultipartError) -> AppError {
    AppError::Validation {
        message: format!("malformed multipart body: {err}"),
        fields: Vec::new(),
    }
}
