//! Keuangan routes (transactions, summaries and the monthly report)
//!
//! JSON CRUD plus the read-only roll-ups. Any authenticated role may use
//! these routes; amounts arrive as JSON numbers or numeric strings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use super::middleware::AuthUser;
use super::AppState;
use crate::domain::{
    validate_transaksi_create, validate_transaksi_update, Transaksi, TransaksiData,
};
use crate::error::AppError;
use crate::summary::{self, SummaryAllTime, SummaryBulanan};

/// Transaction payload. `jumlah` stays raw JSON so both `500000` and
/// `"500000"` are accepted; validation decides what it means.
#[derive(Debug, Deserialize)]
pub struct TransaksiPayload {
    #[serde(default)]
    pub jenis: Option<String>,
    #[serde(default)]
    pub jumlah: Option<Value>,
    #[serde(default)]
    pub keterangan: Option<String>,
    #[serde(default)]
    pub tanggal: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodeQuery {
    pub bulan: Option<String>,
    pub tahun: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Transaksi>>, AppError> {
    Ok(Json(state.store.list_transaksi().await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Transaksi>, AppError> {
    let transaksi = state
        .store
        .transaksi_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Transaksi"))?;
    Ok(Json(transaksi))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<TransaksiPayload>,
) -> Result<(StatusCode, Json<Transaksi>), AppError> {
    let draft = validate_transaksi_create(
        payload.jenis.as_deref(),
        payload.jumlah.as_ref(),
        payload.keterangan.as_deref(),
        payload.tanggal.as_deref(),
    )?;

    let transaksi = state
        .store
        .create_transaksi(TransaksiData {
            jenis: draft.jenis,
            jumlah: draft.jumlah,
            keterangan: draft.keterangan,
            tanggal: draft.tanggal,
            user_id: user.user_id,
        })
        .await?;

    tracing::info!(id = transaksi.id, jenis = %transaksi.jenis, "transaksi created");
    Ok((StatusCode::CREATED, Json(transaksi)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TransaksiPayload>,
) -> Result<Json<Transaksi>, AppError> {
    let patch = validate_transaksi_update(
        payload.jenis.as_deref(),
        payload.jumlah.as_ref(),
        payload.keterangan.as_deref(),
        payload.tanggal.as_deref(),
    )?;

    let existing = state
        .store
        .transaksi_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Transaksi"))?;

    let transaksi = state
        .store
        .update_transaksi(
            id,
            TransaksiData {
                jenis: patch.jenis.unwrap_or(existing.jenis),
                jumlah: patch.jumlah.unwrap_or(existing.jumlah),
                keterangan: patch.keterangan.unwrap_or(existing.keterangan),
                tanggal: patch.tanggal.unwrap_or(existing.tanggal),
                user_id: existing.user_id,
            },
        )
        .await?;

    Ok(Json(transaksi))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .transaksi_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Transaksi"))?;
    state.store.delete_transaksi(id).await?;

    tracing::info!(id, "transaksi deleted");
    Ok(Json(json!({ "message": "Transaksi berhasil dihapus" })))
}

/// GET /api/keuangan/summary: all-time totals
pub async fn summary(State(state): State<AppState>) -> Result<Json<SummaryAllTime>, AppError> {
    Ok(Json(summary::all_time(state.store.as_ref()).await?))
}

/// GET /api/keuangan/summary/bulanan: month totals over the opening balance.
/// Missing bulan/tahun default to the current month.
pub async fn summary_bulanan(
    State(state): State<AppState>,
    Query(periode): Query<PeriodeQuery>,
) -> Result<Json<SummaryBulanan>, AppError> {
    let result = summary::bulanan(
        state.store.as_ref(),
        periode.bulan.as_deref(),
        periode.tahun.as_deref(),
        state.config.kas_awal,
    )
    .await?;
    Ok(Json(result))
}

/// GET /api/keuangan/laporan: transactions of one month, ascending
pub async fn laporan(
    State(state): State<AppState>,
    Query(periode): Query<PeriodeQuery>,
) -> Result<Json<Vec<Transaksi>>, AppError> {
    let rows = summary::laporan(
        state.store.as_ref(),
        periode.bulan.as_deref(),
        periode.tahun.as_deref(),
    )
    .await?;
    Ok(Json(rows))
}
