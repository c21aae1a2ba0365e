//! Jemaat routes (member directory)
//!
//! One record per user account. The one-per-user rule is enforced by the
//! store's uniqueness constraint, so concurrent creates cannot both win.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::json;

use super::middleware::AuthUser;
use super::{read_form, AppState};
use crate::auth::Role;
use crate::domain::{
    validate_jemaat_create, validate_jemaat_update, ImagePatch, Jemaat, JemaatData,
};
use crate::error::AppError;
use crate::uploads;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Jemaat>>, AppError> {
    Ok(Json(state.store.list_jemaat().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Jemaat>, AppError> {
    let jemaat = state
        .store
        .jemaat_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Data jemaat"))?;
    Ok(Json(jemaat))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Jemaat>), AppError> {
    if user.role != Role::Sekretaris {
        return Err(AppError::Forbidden);
    }

    let form = read_form(multipart, "img").await?;
    let draft = validate_jemaat_create(&form.fields)?;

    let img = match form.file {
        Some(file) => Some(
            uploads::save_upload(&state.config.upload_dir, "jemaat", &file.name, &file.bytes)
                .await?,
        ),
        None => None,
    };

    let jemaat = state
        .store
        .create_jemaat(JemaatData {
            nama_lengkap: draft.nama_lengkap,
            alamat: draft.alamat,
            tanggal_lahir: draft.tanggal_lahir,
            nomor_hp: draft.nomor_hp,
            status_keanggotaan: draft.status_keanggotaan,
            img,
            user_id: user.user_id,
        })
        .await?;

    tracing::info!(id = jemaat.id, "jemaat created");
    Ok((StatusCode::CREATED, Json(jemaat)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Jemaat>, AppError> {
    let form = read_form(multipart, "img").await?;
    let patch = validate_jemaat_update(&form.fields)?;

    let existing = state
        .store
        .jemaat_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Data jemaat"))?;

    let img = match form.file {
        Some(file) => ImagePatch::Set(
            uploads::save_upload(&state.config.upload_dir, "jemaat", &file.name, &file.bytes)
                .await?,
        ),
        None => ImagePatch::Keep,
    };

    let jemaat = state
        .store
        .update_jemaat(
            id,
            JemaatData {
                nama_lengkap: patch.nama_lengkap.unwrap_or(existing.nama_lengkap),
                alamat: patch.alamat.unwrap_or(existing.alamat),
                tanggal_lahir: patch.tanggal_lahir.unwrap_or(existing.tanggal_lahir),
                nomor_hp: patch.nomor_hp.unwrap_or(existing.nomor_hp),
                status_keanggotaan: patch
                    .status_keanggotaan
                    .unwrap_or(existing.status_keanggotaan),
                img: img.resolve(existing.img),
                user_id: existing.user_id,
            },
        )
        .await?;

    Ok(Json(jemaat))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .store
        .jemaat_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Data jemaat"))?;
    state.store.delete_jemaat(id).await?;

    tracing::info!(id, "jemaat deleted");
    Ok(Json(json!({ "message": "Data jemaat berhasil dihapus" })))
}
