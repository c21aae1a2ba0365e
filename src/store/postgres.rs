//! Postgres-backed record store
//!
//! Thin sqlx adapter: single-row statements plus the two aggregate queries
//! the summary service needs. All validation happens before this layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;

use super::RecordStore;
use crate::auth::Role;
use crate::domain::{
    DateRange, Jadwal, JadwalData, Jemaat, JemaatData, Jenis, NewUser, Renungan, RenunganData,
    Transaksi, TransaksiData, User,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw user row; `role` is parsed into the enum on the way out
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    nama: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|e| AppError::Internal(format!("unexpected role in storage: {e}")))?;
        Ok(User {
            id: row.id,
            nama: row.nama,
            email: row.email,
            password: row.password,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransaksiRow {
    id: i64,
    jenis: String,
    jumlah: Decimal,
    keterangan: String,
    tanggal: NaiveDate,
    user_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransaksiRow> for Transaksi {
    type Error = AppError;

    fn try_from(row: TransaksiRow) -> Result<Self, Self::Error> {
        let jenis = Jenis::from_str(&row.jenis)
            .map_err(|e| AppError::Internal(format!("unexpected jenis in storage: {e}")))?;
        Ok(Transaksi {
            id: row.id,
            jenis,
            jumlah: row.jumlah,
            keterangan: row.keterangan,
            tanggal: row.tanggal,
            user_id: row.user_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ---- users ----

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, nama, email, password, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (nama, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, nama, email, password, role, created_at
            "#,
        )
        .bind(&user.nama)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email sudah terdaftar"))?;

        row.try_into()
    }

    // ---- jadwal ----

    async fn list_jadwal(&self) -> AppResult<Vec<Jadwal>> {
        let rows = sqlx::query_as::<_, Jadwal>(
            r#"
            SELECT id, judul, deskripsi, tanggal, image, user_id, created_at
            FROM jadwal
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn jadwal_by_id(&self, id: i64) -> AppResult<Option<Jadwal>> {
        let row = sqlx::query_as::<_, Jadwal>(
            "SELECT id, judul, deskripsi, tanggal, image, user_id, created_at FROM jadwal WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_jadwal(&self, data: JadwalData) -> AppResult<Jadwal> {
        let row = sqlx::query_as::<_, Jadwal>(
            r#"
            INSERT INTO jadwal (judul, deskripsi, tanggal, image, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, judul, deskripsi, tanggal, image, user_id, created_at
            "#,
        )
        .bind(&data.judul)
        .bind(&data.deskripsi)
        .bind(data.tanggal)
        .bind(&data.image)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_jadwal(&self, id: i64, data: JadwalData) -> AppResult<Jadwal> {
        let row = sqlx::query_as::<_, Jadwal>(
            r#"
            UPDATE jadwal
            SET judul = $2, deskripsi = $3, tanggal = $4, image = $5
            WHERE id = $1
            RETURNING id, judul, deskripsi, tanggal, image, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(&data.judul)
        .bind(&data.deskripsi)
        .bind(data.tanggal)
        .bind(&data.image)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(AppError::NotFound("jadwal"))
    }

    async fn delete_jadwal(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM jadwal WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("jadwal"));
        }
        Ok(())
    }

    // ---- renungan ----

    async fn list_renungan(&self) -> AppResult<Vec<Renungan>> {
        let rows = sqlx::query_as::<_, Renungan>(
            r#"
            SELECT id, judul, isi, tanggal, img, user_id, created_at
            FROM renungan
            ORDER BY tanggal DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn renungan_by_id(&self, id: i64) -> AppResult<Option<Renungan>> {
        let row = sqlx::query_as::<_, Renungan>(
            "SELECT id, judul, isi, tanggal, img, user_id, created_at FROM renungan WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_renungan(&self, data: RenunganData) -> AppResult<Renungan> {
        let row = sqlx::query_as::<_, Renungan>(
            r#"
            INSERT INTO renungan (judul, isi, tanggal, img, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, judul, isi, tanggal, img, user_id, created_at
            "#,
        )
        .bind(&data.judul)
        .bind(&data.isi)
        .bind(data.tanggal)
        .bind(&data.img)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_renungan(&self, id: i64, data: RenunganData) -> AppResult<Renungan> {
        let row = sqlx::query_as::<_, Renungan>(
            r#"
            UPDATE renungan
            SET judul = $2, isi = $3, tanggal = $4, img = $5
            WHERE id = $1
            RETURNING id, judul, isi, tanggal, img, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(&data.judul)
        .bind(&data.isi)
        .bind(data.tanggal)
        .bind(&data.img)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(AppError::NotFound("renungan"))
    }

    async fn delete_renungan(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM renungan WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("renungan"));
        }
        Ok(())
    }

    // ---- jemaat ----

    async fn list_jemaat(&self) -> AppResult<Vec<Jemaat>> {
        let rows = sqlx::query_as::<_, Jemaat>(
            r#"
            SELECT id, nama_lengkap, alamat, tanggal_lahir, nomor_hp,
                   status_keanggotaan, img, user_id, created_at
            FROM jemaat
            ORDER BY tanggal_lahir DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn jemaat_by_id(&self, id: i64) -> AppResult<Option<Jemaat>> {
        let row = sqlx::query_as::<_, Jemaat>(
            r#"
            SELECT id, nama_lengkap, alamat, tanggal_lahir, nomor_hp,
                   status_keanggotaan, img, user_id, created_at
            FROM jemaat WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_jemaat(&self, data: JemaatData) -> AppResult<Jemaat> {
        // The UNIQUE(user_id) constraint closes the check-then-create race
        let row = sqlx::query_as::<_, Jemaat>(
            r#"
            INSERT INTO jemaat
                (nama_lengkap, alamat, tanggal_lahir, nomor_hp, status_keanggotaan, img, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, nama_lengkap, alamat, tanggal_lahir, nomor_hp,
                      status_keanggotaan, img, user_id, created_at
            "#,
        )
        .bind(&data.nama_lengkap)
        .bind(&data.alamat)
        .bind(data.tanggal_lahir)
        .bind(&data.nomor_hp)
        .bind(data.status_keanggotaan)
        .bind(&data.img)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "User sudah memiliki data jemaat"))?;
        Ok(row)
    }

    async fn update_jemaat(&self, id: i64, data: JemaatData) -> AppResult<Jemaat> {
        let row = sqlx::query_as::<_, Jemaat>(
            r#"
            UPDATE jemaat
            SET nama_lengkap = $2, alamat = $3, tanggal_lahir = $4,
                nomor_hp = $5, status_keanggotaan = $6, img = $7
            WHERE id = $1
            RETURNING id, nama_lengkap, alamat, tanggal_lahir, nomor_hp,
                      status_keanggotaan, img, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(&data.nama_lengkap)
        .bind(&data.alamat)
        .bind(data.tanggal_lahir)
        .bind(&data.nomor_hp)
        .bind(data.status_keanggotaan)
        .bind(&data.img)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(AppError::NotFound("jemaat"))
    }

    async fn delete_jemaat(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM jemaat WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("jemaat"));
        }
        Ok(())
    }

    // ---- keuangan ----

    async fn list_transaksi(&self) -> AppResult<Vec<Transaksi>> {
        let rows: Vec<TransaksiRow> = sqlx::query_as(
            r#"
            SELECT id, jenis, jumlah, keterangan, tanggal, user_id, created_at
            FROM transaksi_keuangan
            ORDER BY tanggal DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Transaksi::try_from).collect()
    }

    async fn transaksi_by_id(&self, id: i64) -> AppResult<Option<Transaksi>> {
        let row: Option<TransaksiRow> = sqlx::query_as(
            r#"
            SELECT id, jenis, jumlah, keterangan, tanggal, user_id, created_at
            FROM transaksi_keuangan WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Transaksi::try_from).transpose()
    }

    async fn create_transaksi(&self, data: TransaksiData) -> AppResult<Transaksi> {
        let row: TransaksiRow = sqlx::query_as(
            r#"
            INSERT INTO transaksi_keuangan (jenis, jumlah, keterangan, tanggal, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, jenis, jumlah, keterangan, tanggal, user_id, created_at
            "#,
        )
        .bind(data.jenis.as_str())
        .bind(data.jumlah)
        .bind(&data.keterangan)
        .bind(data.tanggal)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update_transaksi(&self, id: i64, data: TransaksiData) -> AppResult<Transaksi> {
        let row: Option<TransaksiRow> = sqlx::query_as(
            r#"
            UPDATE transaksi_keuangan
            SET jenis = $2, jumlah = $3, keterangan = $4, tanggal = $5
            WHERE id = $1
            RETURNING id, jenis, jumlah, keterangan, tanggal, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(data.jenis.as_str())
        .bind(data.jumlah)
        .bind(&data.keterangan)
        .bind(data.tanggal)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(AppError::NotFound("transaksi"))?.try_into()
    }

    async fn delete_transaksi(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM transaksi_keuangan WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("transaksi"));
        }
        Ok(())
    }

    async fn sum_jumlah(&self, jenis: Jenis, range: Option<DateRange>) -> AppResult<Decimal> {
        let sum: Decimal = match range {
            Some(range) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COALESCE(SUM(jumlah), 0)
                    FROM transaksi_keuangan
                    WHERE jenis = $1 AND tanggal >= $2 AND tanggal < $3
                    "#,
                )
                .bind(jenis.as_str())
                .bind(range.from)
                .bind(range.to)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT COALESCE(SUM(jumlah), 0) FROM transaksi_keuangan WHERE jenis = $1",
                )
                .bind(jenis.as_str())
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(sum)
    }

    async fn transaksi_in_range(&self, range: DateRange) -> AppResult<Vec<Transaksi>> {
        let rows: Vec<TransaksiRow> = sqlx::query_as(
            r#"
            SELECT id, jenis, jumlah, keterangan, tanggal, user_id, created_at
            FROM transaksi_keuangan
            WHERE tanggal >= $1 AND tanggal < $2
            ORDER BY tanggal ASC
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Transaksi::try_from).collect()
    }
}

fn map_unique_violation(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::from(e),
    }
}
