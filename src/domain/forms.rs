//! Form validation and normalization
//!
//! Per-entity validators for create/update payloads. Every check here runs
//! before anything touches the store: missing fields are reported as a
//! complete list, dates must parse, amounts must be non-negative numbers.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;

use super::entities::Jenis;
use crate::error::{AppError, AppResult};

// =========================================================================
// Field parsers
// =========================================================================

/// Parse a date field: `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_tanggal(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Permissive boolean coercion: only the literal string `"true"` counts as
/// true, every other value (including `"false"`, `"1"`, garbage) is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}

/// Parse an amount from a JSON number or a numeric string.
pub fn parse_jumlah(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Attachment update semantics: absent file means keep the stored value,
/// never clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePatch {
    Keep,
    Clear,
    Set(String),
}

impl ImagePatch {
    pub fn resolve(self, existing: Option<String>) -> Option<String> {
        match self {
            ImagePatch::Keep => existing,
            ImagePatch::Clear => None,
            ImagePatch::Set(path) => Some(path),
        }
    }
}

/// Non-empty trimmed field value, or a recorded omission
fn required<'a>(
    fields: &'a HashMap<String, String>,
    name: &str,
    missing: &mut Vec<String>,
) -> Option<&'a str> {
    match fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(value) => Some(value),
        None => {
            missing.push(name.to_string());
            None
        }
    }
}

fn optional<'a>(fields: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn required_tanggal(value: &str, field: &str) -> AppResult<NaiveDate> {
    parse_tanggal(value).ok_or_else(|| AppError::invalid_field(field, "invalid date"))
}

// =========================================================================
// Jadwal
// =========================================================================

#[derive(Debug, Clone)]
pub struct JadwalDraft {
    pub judul: String,
    pub deskripsi: String,
    pub tanggal: NaiveDate,
}

pub fn validate_jadwal_create(fields: &HashMap<String, String>) -> AppResult<JadwalDraft> {
    let mut missing = Vec::new();
    let judul = required(fields, "judul", &mut missing);
    let deskripsi = required(fields, "deskripsi", &mut missing);
    let tanggal = required(fields, "tanggal", &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing_fields(missing));
    }

    Ok(JadwalDraft {
        judul: judul.unwrap_or_default().to_string(),
        deskripsi: deskripsi.unwrap_or_default().to_string(),
        tanggal: required_tanggal(tanggal.unwrap_or_default(), "tanggal")?,
    })
}

#[derive(Debug, Clone, Default)]
pub struct JadwalPatch {
    pub judul: Option<String>,
    pub deskripsi: Option<String>,
    pub tanggal: Option<NaiveDate>,
}

pub fn validate_jadwal_update(fields: &HashMap<String, String>) -> AppResult<JadwalPatch> {
    Ok(JadwalPatch {
        judul: optional(fields, "judul").map(str::to_string),
        deskripsi: optional(fields, "deskripsi").map(str::to_string),
        tanggal: optional(fields, "tanggal")
            .map(|v| required_tanggal(v, "tanggal"))
            .transpose()?,
    })
}

// =========================================================================
// Renungan
// =========================================================================

#[derive(Debug, Clone)]
pub struct RenunganDraft {
    pub judul: String,
    pub isi: String,
    pub tanggal: NaiveDate,
}

pub fn validate_renungan_create(fields: &HashMap<String, String>) -> AppResult<RenunganDraft> {
    let mut missing = Vec::new();
    let judul = required(fields, "judul", &mut missing);
    let isi = required(fields, "isi", &mut missing);
    let tanggal = required(fields, "tanggal", &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing_fields(missing));
    }

    Ok(RenunganDraft {
        judul: judul.unwrap_or_default().to_string(),
        isi: isi.unwrap_or_default().to_string(),
        tanggal: required_tanggal(tanggal.unwrap_or_default(), "tanggal")?,
    })
}

#[derive(Debug, Clone, Default)]
pub struct RenunganPatch {
    pub judul: Option<String>,
    pub isi: Option<String>,
    pub tanggal: Option<NaiveDate>,
}

pub fn validate_renungan_update(fields: &HashMap<String, String>) -> AppResult<RenunganPatch> {
    Ok(RenunganPatch {
        judul: optional(fields, "judul").map(str::to_string),
        isi: optional(fields, "isi").map(str::to_string),
        tanggal: optional(fields, "tanggal")
            .map(|v| required_tanggal(v, "tanggal"))
            .transpose()?,
    })
}

// =========================================================================
// Jemaat
// =========================================================================

#[derive(Debug, Clone)]
pub struct JemaatDraft {
    pub nama_lengkap: String,
    pub alamat: String,
    pub tanggal_lahir: NaiveDate,
    pub nomor_hp: String,
    pub status_keanggotaan: bool,
}

pub fn validate_jemaat_create(fields: &HashMap<String, String>) -> AppResult<JemaatDraft> {
    let mut missing = Vec::new();
    let nama_lengkap = required(fields, "namaLengkap", &mut missing);
    let alamat = required(fields, "alamat", &mut missing);
    let tanggal_lahir = required(fields, "tanggalLahir", &mut missing);
    let nomor_hp = required(fields, "nomorHp", &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing_fields(missing));
    }

    Ok(JemaatDraft {
        nama_lengkap: nama_lengkap.unwrap_or_default().to_string(),
        alamat: alamat.unwrap_or_default().to_string(),
        tanggal_lahir: required_tanggal(tanggal_lahir.unwrap_or_default(), "tanggalLahir")?,
        nomor_hp: nomor_hp.unwrap_or_default().to_string(),
        // Absent on create is falsy, matching the permissive coercion
        status_keanggotaan: optional(fields, "statusKeanggotaan")
            .map(parse_flag)
            .unwrap_or(false),
    })
}

#[derive(Debug, Clone, Default)]
pub struct JemaatPatch {
    pub nama_lengkap: Option<String>,
    pub alamat: Option<String>,
    pub tanggal_lahir: Option<NaiveDate>,
    pub nomor_hp: Option<String>,
    pub status_keanggotaan: Option<bool>,
}

pub fn validate_jemaat_update(fields: &HashMap<String, String>) -> AppResult<JemaatPatch> {
    Ok(JemaatPatch {
        nama_lengkap: optional(fields, "namaLengkap").map(str::to_string),
        alamat: optional(fields, "alamat").map(str::to_string),
        tanggal_lahir: optional(fields, "tanggalLahir")
            .map(|v| required_tanggal(v, "tanggalLahir"))
            .transpose()?,
        nomor_hp: optional(fields, "nomorHp").map(str::to_string),
        status_keanggotaan: optional(fields, "statusKeanggotaan").map(parse_flag),
    })
}

// =========================================================================
// Transaksi
// =========================================================================

#[derive(Debug, Clone)]
pub struct TransaksiDraft {
    pub jenis: Jenis,
    pub jumlah: Decimal,
    pub keterangan: String,
    pub tanggal: NaiveDate,
}

fn parse_jenis_field(value: &str) -> AppResult<Jenis> {
    Jenis::from_str(value)
        .map_err(|_| AppError::invalid_field("jenis", "must be PEMASUKAN or PENGELUARAN"))
}

fn parse_jumlah_field(value: &Value) -> AppResult<Decimal> {
    let jumlah = parse_jumlah(value)
        .ok_or_else(|| AppError::invalid_field("jumlah", "must be a numeric amount"))?;
    if jumlah < Decimal::ZERO {
        return Err(AppError::invalid_field("jumlah", "must not be negative"));
    }
    Ok(jumlah)
}

pub fn validate_transaksi_create(
    jenis: Option<&str>,
    jumlah: Option<&Value>,
    keterangan: Option<&str>,
    tanggal: Option<&str>,
) -> AppResult<TransaksiDraft> {
    let mut missing = Vec::new();
    let jenis = jenis.map(str::trim).filter(|v| !v.is_empty());
    if jenis.is_none() {
        missing.push("jenis".to_string());
    }
    let jumlah = jumlah.filter(|v| !v.is_null());
    if jumlah.is_none() {
        missing.push("jumlah".to_string());
    }
    let keterangan = keterangan.map(str::trim).filter(|v| !v.is_empty());
    if keterangan.is_none() {
        missing.push("keterangan".to_string());
    }
    let tanggal = tanggal.map(str::trim).filter(|v| !v.is_empty());
    if tanggal.is_none() {
        missing.push("tanggal".to_string());
    }
    if !missing.is_empty() {
        return Err(AppError::missing_fields(missing));
    }

    Ok(TransaksiDraft {
        jenis: parse_jenis_field(jenis.unwrap_or_default())?,
        jumlah: parse_jumlah_field(jumlah.unwrap_or(&Value::Null))?,
        keterangan: keterangan.unwrap_or_default().to_string(),
        tanggal: required_tanggal(tanggal.unwrap_or_default(), "tanggal")?,
    })
}

#[derive(Debug, Clone, Default)]
pub struct TransaksiPatch {
    pub jenis: Option<Jenis>,
    pub jumlah: Option<Decimal>,
    pub keterangan: Option<String>,
    pub tanggal: Option<NaiveDate>,
}

pub fn validate_transaksi_update(
    jenis: Option<&str>,
    jumlah: Option<&Value>,
    keterangan: Option<&str>,
    tanggal: Option<&str>,
) -> AppResult<TransaksiPatch> {
    Ok(TransaksiPatch {
        jenis: jenis
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(parse_jenis_field)
            .transpose()?,
        jumlah: jumlah
            .filter(|v| !v.is_null())
            .map(parse_jumlah_field)
            .transpose()?,
        keterangan: keterangan
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        tanggal: tanggal
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| required_tanggal(v, "tanggal"))
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_tanggal_accepts_plain_and_rfc3339() {
        assert_eq!(
            parse_tanggal("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_tanggal("2024-03-05T10:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_tanggal("05/03/2024"), None);
        assert_eq!(parse_tanggal("2024-13-01"), None);
        assert_eq!(parse_tanggal(""), None);
    }

    #[test]
    fn parse_flag_only_true_is_true() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn parse_jumlah_accepts_number_and_string() {
        assert_eq!(parse_jumlah(&json!(500)), Some(dec!(500)));
        assert_eq!(parse_jumlah(&json!("250.75")), Some(dec!(250.75)));
        assert_eq!(parse_jumlah(&json!(12.5)), Some(dec!(12.5)));
        assert_eq!(parse_jumlah(&json!("abc")), None);
        assert_eq!(parse_jumlah(&json!(true)), None);
        assert_eq!(parse_jumlah(&json!(null)), None);
    }

    #[test]
    fn image_patch_resolution() {
        let existing = Some("uploads/jadwal/old.jpg".to_string());
        assert_eq!(ImagePatch::Keep.resolve(existing.clone()), existing);
        assert_eq!(ImagePatch::Clear.resolve(existing.clone()), None);
        assert_eq!(
            ImagePatch::Set("uploads/jadwal/new.jpg".to_string()).resolve(existing),
            Some("uploads/jadwal/new.jpg".to_string())
        );
        assert_eq!(ImagePatch::Keep.resolve(None), None);
    }

    #[test]
    fn jadwal_create_lists_every_missing_field() {
        let err = validate_jadwal_create(&fields(&[("judul", "Ibadah Minggu")])).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields, vec!["deskripsi", "tanggal"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn jadwal_create_rejects_bad_date() {
        let err = validate_jadwal_create(&fields(&[
            ("judul", "Ibadah Minggu"),
            ("deskripsi", "Ibadah raya"),
            ("tanggal", "next sunday"),
        ]))
        .unwrap_err();
        match err {
            AppError::Validation { fields, .. } => assert_eq!(fields, vec!["tanggal"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn jadwal_create_accepts_valid_input() {
        let draft = validate_jadwal_create(&fields(&[
            ("judul", "Ibadah Minggu"),
            ("deskripsi", "Ibadah raya pagi"),
            ("tanggal", "2025-01-12"),
        ]))
        .unwrap();
        assert_eq!(draft.judul, "Ibadah Minggu");
        assert_eq!(draft.tanggal, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    }

    #[test]
    fn jadwal_update_absent_fields_stay_none() {
        let patch = validate_jadwal_update(&fields(&[("judul", "Baru")])).unwrap();
        assert_eq!(patch.judul.as_deref(), Some("Baru"));
        assert!(patch.deskripsi.is_none());
        assert!(patch.tanggal.is_none());
    }

    #[test]
    fn jemaat_create_coerces_status() {
        let base = [
            ("namaLengkap", "Budi Santoso"),
            ("alamat", "Jl. Mawar 1"),
            ("tanggalLahir", "1990-06-15"),
            ("nomorHp", "08123456789"),
        ];

        let mut with_status = base.to_vec();
        with_status.push(("statusKeanggotaan", "true"));
        assert!(validate_jemaat_create(&fields(&with_status))
            .unwrap()
            .status_keanggotaan);

        let mut odd_status = base.to_vec();
        odd_status.push(("statusKeanggotaan", "aktif"));
        assert!(!validate_jemaat_create(&fields(&odd_status))
            .unwrap()
            .status_keanggotaan);

        // Absent on create is falsy
        assert!(!validate_jemaat_create(&fields(&base))
            .unwrap()
            .status_keanggotaan);
    }

    #[test]
    fn transaksi_create_requires_all_fields() {
        let err = validate_transaksi_create(Some("PEMASUKAN"), None, None, None).unwrap_err();
        match err {
            AppError::Validation { fields, .. } => {
                assert_eq!(fields, vec!["jumlah", "keterangan", "tanggal"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn transaksi_create_rejects_bad_jenis_and_negative_jumlah() {
        let err = validate_transaksi_create(
            Some("TRANSFER"),
            Some(&json!(100)),
            Some("Persembahan"),
            Some("2024-03-05"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = validate_transaksi_create(
            Some("PEMASUKAN"),
            Some(&json!(-5)),
            Some("Persembahan"),
            Some("2024-03-05"),
        )
        .unwrap_err();
        match err {
            AppError::Validation { fields, .. } => assert_eq!(fields, vec!["jumlah"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn transaksi_create_accepts_string_amount() {
        let draft = validate_transaksi_create(
            Some("PENGELUARAN"),
            Some(&json!("750.50")),
            Some("Biaya listrik"),
            Some("2024-03-20"),
        )
        .unwrap();
        assert_eq!(draft.jenis, Jenis::Pengeluaran);
        assert_eq!(draft.jumlah, dec!(750.50));
    }
}
