//! Record store
//!
//! The single persistence boundary. Handlers and the summary service talk
//! to this trait, never to a connection pool directly, so the whole router
//! can run against the in-memory implementation in tests.

mod memory;
mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{
    DateRange, Jadwal, JadwalData, Jemaat, JemaatData, Jenis, NewUser, Renungan, RenunganData,
    Transaksi, TransaksiData, User,
};
use crate::error::AppResult;

#[async_trait]
pub trait RecordStore: Send + Sync {
    // ---- liveness ----
    async fn ping(&self) -> AppResult<()>;

    // ---- users ----
    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    // ---- jadwal ----
    async fn list_jadwal(&self) -> AppResult<Vec<Jadwal>>;
    async fn jadwal_by_id(&self, id: i64) -> AppResult<Option<Jadwal>>;
    async fn create_jadwal(&self, data: JadwalData) -> AppResult<Jadwal>;
    async fn update_jadwal(&self, id: i64, data: JadwalData) -> AppResult<Jadwal>;
    async fn delete_jadwal(&self, id: i64) -> AppResult<()>;

    // ---- renungan ----
    async fn list_renungan(&self) -> AppResult<Vec<Renungan>>;
    async fn renungan_by_id(&self, id: i64) -> AppResult<Option<Renungan>>;
    async fn create_renungan(&self, data: RenunganData) -> AppResult<Renungan>;
    async fn update_renungan(&self, id: i64, data: RenunganData) -> AppResult<Renungan>;
    async fn delete_renungan(&self, id: i64) -> AppResult<()>;

    // ---- jemaat ----
    async fn list_jemaat(&self) -> AppResult<Vec<Jemaat>>;
    async fn jemaat_by_id(&self, id: i64) -> AppResult<Option<Jemaat>>;
    /// Fails with `Conflict` when the user already has a record; enforced by
    /// a storage-level uniqueness constraint, not a check-then-create.
    async fn create_jemaat(&self, data: JemaatData) -> AppResult<Jemaat>;
    async fn update_jemaat(&self, id: i64, data: JemaatData) -> AppResult<Jemaat>;
    async fn delete_jemaat(&self, id: i64) -> AppResult<()>;

    // ---- keuangan ----
    async fn list_transaksi(&self) -> AppResult<Vec<Transaksi>>;
    async fn transaksi_by_id(&self, id: i64) -> AppResult<Option<Transaksi>>;
    async fn create_transaksi(&self, data: TransaksiData) -> AppResult<Transaksi>;
    async fn update_transaksi(&self, id: i64, data: TransaksiData) -> AppResult<Transaksi>;
    async fn delete_transaksi(&self, id: i64) -> AppResult<()>;

    /// Sum of `jumlah` for one transaction kind, optionally limited to a
    /// date window. Empty sets sum to zero, never null.
    async fn sum_jumlah(&self, jenis: Jenis, range: Option<DateRange>) -> AppResult<Decimal>;

    /// Transactions inside a window, ascending by date
    async fn transaksi_in_range(&self, range: DateRange) -> AppResult<Vec<Transaksi>>;
}
