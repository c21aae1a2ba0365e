//! Jadwal ibadah routes (service schedules)
//!
//! Multipart CRUD. Create is restricted to SEKRETARIS; updates merge
//! field-by-field and keep the stored image unless a new file arrives.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;

use super::middleware::AuthUser;
use super::{read_form, AppState};
use crate::auth::Role;
use crate::domain::{validate_jadwal_create, validate_jadwal_update, ImagePatch, Jadwal, JadwalData};
use crate::error::AppError;
use crate::uploads;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Jadwal>>, AppError> {
    Ok(Json(state.store.list_jadwal().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Jadwal>, AppError> {
    let jadwal = state
        .store
        .jadwal_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Jadwal ibadah"))?;
    Ok(Json(jadwal))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Jadwal>), AppError> {
    if user.role != Role::Sekretaris {
        return Err(AppError::Forbidden);
    }

    let form = read_form(multipart, "image").await?;
    let draft = validate_jadwal_create(&form.fields)?;

    // Nothing hits the disk until the payload is valid
    let image = match form.file {
        Some(file) => Some(
            uploads::save_upload(&state.config.upload_dir, "jadwal", &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let jadwal = state
        .store
        .create_jadwal(JadwalData {
            judul: draft.judul,
            deskripsi: draft.deskripsi,
            tanggal: draft.tanggal,
            image,
            user_id: user.user_id,
        })
        .await?;

    tracing::info!(id = jadwal.id, "jadwal created");
    Ok((StatusCode::CREATED, Json(jadwal)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Jadwal>, AppError> {
    let form = read_form(multipart, "image").await?;
    let patch = validate_jadwal_update(&form.fields)?;

    let existing = state
        .store
        .jadwal_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Jadwal ibadah"))?;

    let image = match form.file {
        Some(file) => ImagePatch::Set(
            uploads::save_upload(&state.config.upload_dir, "jadwal", &file.name, &file.bytes)
                .await?,
        ),
        None => ImagePatch::Keep,
    };

    let jadwal = state
        .store
        .update_jadwal(
            id,
            JadwalData {
                judul: patch.judul.unwrap_or(existing.judul),
                deskripsi: patch.deskripsi.unwrap_or(existing.deskripsi),
                tanggal: patch.tanggal.unwrap_or(existing.tanggal),
                image: image.resolve(existing.image),
                user_id: existing.user_id,
            },
        )
        .await?;

    Ok(Json(jadwal))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .jadwal_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Jadwal ibadah"))?;
    state.store.delete_jadwal(id).await?;

    tracing::info!(id, "jadwal deleted");
    Ok(Json(json!({ "message": "Jadwal ibadah berhasil dihapus" })))
}
