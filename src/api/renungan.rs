//! Renungan routes (devotionals)

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;

use super::middleware::AuthUser;
use super::{read_form, AppState};
use crate::auth::Role;
use crate::domain::{
    validate_renungan_create, validate_renungan_update, ImagePatch, Renungan, RenunganData,
};
use crate::error::AppError;
use crate::uploads;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Renungan>>, AppError> {
    Ok(Json(state.store.list_renungan().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Renungan>, AppError> {
    let renungan = state
        .store
        .renungan_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Renungan"))?;
    Ok(Json(renungan))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Renungan>), AppError> {
    if user.role != Role::Sekretaris {
        return Err(AppError::Forbidden);
    }

    let form = read_form(multipart, "img").await?;
    let draft = validate_renungan_create(&form.fields)?;

    let img = match form.file {
        Some(file) => Some(
            uploads::save_upload(&state.config.upload_dir, "renungan", &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let renungan = state
        .store
        .create_renungan(RenunganData {
            judul: draft.judul,
            isi: draft.isi,
            tanggal: draft.tanggal,
            img,
            user_id: user.user_id,
        })
        .await?;

    tracing::info!(id = renungan.id, "renungan created");
    Ok((StatusCode::CREATED, Json(renungan)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Renungan>, AppError> {
    let form = read_form(multipart, "img").await?;
    let patch = validate_renungan_update(&form.fields)?;

    let existing = state
        .store
        .renungan_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Renungan"))?;

    let img = match form.file {
        Some(file) => ImagePatch::Set(
            uploads::save_upload(&state.config.upload_dir, "renungan", &file.name, &file.bytes)
                .await?,
        ),
        None => ImagePatch::Keep,
    };

    let renungan = state
        .store
        .update_renungan(
            id,
            RenunganData {
                judul: patch.judul.unwrap_or(existing.judul),
                isi: patch.isi.unwrap_or(existing.isi),
                tanggal: patch.tanggal.unwrap_or(existing.tanggal),
                img: img.resolve(existing.img),
                user_id: existing.user_id,
            },
        )
        .await?;

    Ok(Json(renungan))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .renungan_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Renungan"))?;
    state.store.delete_renungan(id).await?;

    tracing::info!(id, "renungan deleted");
    Ok(Json(json!({ "message": "Renungan berhasil dihapus" })))
}
