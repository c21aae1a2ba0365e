//! Entity types
//!
//! Rows as stored and as serialized to clients. JSON field names keep the
//! camelCase shape the frontend already consumes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::auth::Role;

/// Transaction kind: income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Jenis {
    Pemasukan,
    Pengeluaran,
}

impl Jenis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jenis::Pemasukan => "PEMASUKAN",
            Jenis::Pengeluaran => "PENGELUARAN",
        }
    }
}

impl fmt::Display for Jenis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Jenis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PEMASUKAN" => Ok(Jenis::Pemasukan),
            "PENGELUARAN" => Ok(Jenis::Pengeluaran),
            other => Err(format!("unknown jenis: {other}")),
        }
    }
}

/// Account row. Never serialized as-is: the stored hash stays internal.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub nama: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of a user, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub nama: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            nama: u.nama,
            email: u.email,
            role: u.role,
        }
    }
}

/// Payload for provisioning a user (seed / admin tooling)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nama: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Service-schedule entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Jadwal {
    pub id: i64,
    pub judul: String,
    pub deskripsi: String,
    pub tanggal: NaiveDate,
    pub image: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Full column set for inserting or rewriting a jadwal row
#[derive(Debug, Clone)]
pub struct JadwalData {
    pub judul: String,
    pub deskripsi: String,
    pub tanggal: NaiveDate,
    pub image: Option<String>,
    pub user_id: i64,
}

/// Devotional post
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Renungan {
    pub id: i64,
    pub judul: String,
    pub isi: String,
    pub tanggal: NaiveDate,
    pub img: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RenunganData {
    pub judul: String,
    pub isi: String,
    pub tanggal: NaiveDate,
    pub img: Option<String>,
    pub user_id: i64,
}

/// Member directory record. At most one per user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Jemaat {
    pub id: i64,
    pub nama_lengkap: String,
    pub alamat: String,
    pub tanggal_lahir: NaiveDate,
    pub nomor_hp: String,
    pub status_keanggotaan: bool,
    pub img: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JemaatData {
    pub nama_lengkap: String,
    pub alamat: String,
    pub tanggal_lahir: NaiveDate,
    pub nomor_hp: String,
    pub status_keanggotaan: bool,
    pub img: Option<String>,
    pub user_id: i64,
}

/// Financial transaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaksi {
    pub id: i64,
    pub jenis: Jenis,
    pub jumlah: Decimal,
    pub keterangan: String,
    pub tanggal: NaiveDate,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TransaksiData {
    pub jenis: Jenis,
    pub jumlah: Decimal,
    pub keterangan: String,
    pub tanggal: NaiveDate,
    pub user_id: i64,
}
