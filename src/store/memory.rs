//! In-memory record store
//!
//! Substitute for Postgres in tests: same contract, including the
//! one-jemaat-per-user uniqueness and zero-sum aggregates.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Mutex;

use super::RecordStore;
use crate::domain::{
    DateRange, Jadwal, JadwalData, Jemaat, JemaatData, Jenis, NewUser, Renungan, RenunganData,
    Transaksi, TransaksiData, User,
};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    users: Vec<User>,
    jadwal: Vec<Jadwal>,
    renungan: Vec<Renungan>,
    jemaat: Vec<Jemaat>,
    transaksi: Vec<Transaksi>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    // ---- users ----

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email sudah terdaftar".to_string()));
        }
        let id = inner.next_id();
        let row = User {
            id,
            nama: user.nama,
            email: user.email,
            password: user.password,
            role: user.role,
            created_at: Utc::now(),
        };
        inner.users.push(row.clone());
        Ok(row)
    }

    // ---- jadwal ----

    async fn list_jadwal(&self) -> AppResult<Vec<Jadwal>> {
        let mut rows = self.lock().jadwal.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn jadwal_by_id(&self, id: i64) -> AppResult<Option<Jadwal>> {
        Ok(self.lock().jadwal.iter().find(|j| j.id == id).cloned())
    }

    async fn create_jadwal(&self, data: JadwalData) -> AppResult<Jadwal> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let row = Jadwal {
            id,
            judul: data.judul,
            deskripsi: data.deskripsi,
            tanggal: data.tanggal,
            image: data.image,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        inner.jadwal.push(row.clone());
        Ok(row)
    }

    async fn update_jadwal(&self, id: i64, data: JadwalData) -> AppResult<Jadwal> {
        let mut inner = self.lock();
        let row = inner
            .jadwal
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(AppError::NotFound("jadwal"))?;
        row.judul = data.judul;
        row.deskripsi = data.deskripsi;
        row.tanggal = data.tanggal;
        row.image = data.image;
        Ok(row.clone())
    }

    async fn delete_jadwal(&self, id: i64) -> AppResult<()> {
        let mut inner = self.lock();
        let before = inner.jadwal.len();
        inner.jadwal.retain(|j| j.id != id);
        if inner.jadwal.len() == before {
            return Err(AppError::NotFound("jadwal"));
        }
        Ok(())
    }

    // ---- renungan ----

    async fn list_renungan(&self) -> AppResult<Vec<Renungan>> {
        let mut rows = self.lock().renungan.clone();
        rows.sort_by(|a, b| b.tanggal.cmp(&a.tanggal).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn renungan_by_id(&self, id: i64) -> AppResult<Option<Renungan>> {
        Ok(self.lock().renungan.iter().find(|r| r.id == id).cloned())
    }

    async fn create_renungan(&self, data: RenunganData) -> AppResult<Renungan> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let row = Renungan {
            id,
            judul: data.judul,
            isi: data.isi,
            tanggal: data.tanggal,
            img: data.img,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        inner.renungan.push(row.clone());
        Ok(row)
    }

    async fn update_renungan(&self, id: i64, data: RenunganData) -> AppResult<Renungan> {
        let mut inner = self.lock();
        let row = inner
            .renungan
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AppError::NotFound("renungan"))?;
        row.judul = data.judul;
        row.isi = data.isi;
        row.tanggal = data.tanggal;
        row.img = data.img;
        Ok(row.clone())
    }

    async fn delete_renungan(&self, id: i64) -> AppResult<()> {
        let mut inner = self.lock();
        let before = inner.renungan.len();
        inner.renungan.retain(|r| r.id != id);
        if inner.renungan.len() == before {
            return Err(AppError::NotFound("renungan"));
        }
        Ok(())
    }

    // ---- jemaat ----

    async fn list_jemaat(&self) -> AppResult<Vec<Jemaat>> {
        let mut rows = self.lock().jemaat.clone();
        rows.sort_by(|a, b| b.tanggal_lahir.cmp(&a.tanggal_lahir).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn jemaat_by_id(&self, id: i64) -> AppResult<Option<Jemaat>> {
        Ok(self.lock().jemaat.iter().find(|j| j.id == id).cloned())
    }

    async fn create_jemaat(&self, data: JemaatData) -> AppResult<Jemaat> {
        let mut inner = self.lock();
        if inner.jemaat.iter().any(|j| j.user_id == data.user_id) {
            return Err(AppError::Conflict(
                "User sudah memiliki data jemaat".to_string(),
            ));
        }
        let id = inner.next_id();
        let row = Jemaat {
            id,
            nama_lengkap: data.nama_lengkap,
            alamat: data.alamat,
            tanggal_lahir: data.tanggal_lahir,
            nomor_hp: data.nomor_hp,
            status_keanggotaan: data.status_keanggotaan,
            img: data.img,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        inner.jemaat.push(row.clone());
        Ok(row)
    }

    async fn update_jemaat(&self, id: i64, data: JemaatData) -> AppResult<Jemaat> {
        let mut inner = self.lock();
        let row = inner
            .jemaat
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(AppError::NotFound("jemaat"))?;
        row.nama_lengkap = data.nama_lengkap;
        row.alamat = data.alamat;
        row.tanggal_lahir = data.tanggal_lahir;
        row.nomor_hp = data.nomor_hp;
        row.status_keanggotaan = data.status_keanggotaan;
        row.img = data.img;
        Ok(row.clone())
    }

    async fn delete_jemaat(&self, id: i64) -> AppResult<()> {
        let mut inner = self.lock();
        let before = inner.jemaat.len();
        inner.jemaat.retain(|j| j.id != id);
        if inner.jemaat.len() == before {
            return Err(AppError::NotFound("jemaat"));
        }
        Ok(())
    }

    // ---- keuangan ----

    async fn list_transaksi(&self) -> AppResult<Vec<Transaksi>> {
        let mut rows = self.lock().transaksi.clone();
        rows.sort_by(|a, b| b.tanggal.cmp(&a.tanggal).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn transaksi_by_id(&self, id: i64) -> AppResult<Option<Transaksi>> {
        Ok(self.lock().transaksi.iter().find(|t| t.id == id).cloned())
    }

    async fn create_transaksi(&self, data: TransaksiData) -> AppResult<Transaksi> {
        let mut inner = self.lock();
        let id = inner.next_id();
        let row = Transaksi {
            id,
            jenis: data.jenis,
            jumlah: data.jumlah,
            keterangan: data.keterangan,
            tanggal: data.tanggal,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        inner.transaksi.push(row.clone());
        Ok(row)
    }

    async fn update_transaksi(&self, id: i64, data: TransaksiData) -> AppResult<Transaksi> {
        let mut inner = self.lock();
        let row = inner
            .transaksi
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound("transaksi"))?;
        row.jenis = data.jenis;
        row.jumlah = data.jumlah;
        row.keterangan = data.keterangan;
        row.tanggal = data.tanggal;
        Ok(row.clone())
    }

    async fn delete_transaksi(&self, id: i64) -> AppResult<()> {
        let mut inner = self.lock();
        let before = inner.transaksi.len();
        inner.transaksi.retain(|t| t.id != id);
        if inner.transaksi.len() == before {
            return Err(AppError::NotFound("transaksi"));
        }
        Ok(())
    }

    async fn sum_jumlah(&self, jenis: Jenis, range: Option<DateRange>) -> AppResult<Decimal> {
        let sum = self
            .lock()
            .transaksi
            .iter()
            .filter(|t| t.jenis == jenis)
            .filter(|t| range.map(|r| r.contains(t.tanggal)).unwrap_or(true))
            .map(|t| t.jumlah)
            .sum();
        Ok(sum)
    }

    async fn transaksi_in_range(&self, range: DateRange) -> AppResult<Vec<Transaksi>> {
        let mut rows: Vec<Transaksi> = self
            .lock()
            .transaksi
            .iter()
            .filter(|t| range.contains(t.tanggal))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.tanggal.cmp(&b.tanggal).then(a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn jemaat_data(user_id: i64) -> JemaatData {
        JemaatData {
            nama_lengkap: "Budi Santoso".to_string(),
            alamat: "Jl. Mawar 1".to_string(),
            tanggal_lahir: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            nomor_hp: "08123456789".to_string(),
            status_keanggotaan: true,
            img: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn duplicate_jemaat_for_user_conflicts_and_keeps_original() {
        let store = MemStore::new();
        let first = store.create_jemaat(jemaat_data(1)).await.unwrap();

        let mut second = jemaat_data(1);
        second.nama_lengkap = "Orang Lain".to_string();
        let err = store.create_jemaat(second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let kept = store.jemaat_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(kept.nama_lengkap, "Budi Santoso");
        assert_eq!(store.list_jemaat().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sum_is_zero_for_empty_store() {
        let store = MemStore::new();
        assert_eq!(
            store.sum_jumlah(Jenis::Pemasukan, None).await.unwrap(),
            Decimal::ZERO
        );
    }

    #[tokio::test]
    async fn sum_respects_jenis_and_range() {
        let store = MemStore::new();
        for (jenis, jumlah, tanggal) in [
            (Jenis::Pemasukan, dec!(500), "2024-03-05"),
            (Jenis::Pengeluaran, dec!(200), "2024-03-20"),
            (Jenis::Pemasukan, dec!(999), "2024-04-01"),
        ] {
            store
                .create_transaksi(TransaksiData {
                    jenis,
                    jumlah,
                    keterangan: "test".to_string(),
                    tanggal: tanggal.parse().unwrap(),
                    user_id: 1,
                })
                .await
                .unwrap();
        }

        let march = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        };
        assert_eq!(
            store
                .sum_jumlah(Jenis::Pemasukan, Some(march))
                .await
                .unwrap(),
            dec!(500)
        );
        assert_eq!(
            store.sum_jumlah(Jenis::Pemasukan, None).await.unwrap(),
            dec!(1499)
        );
    }
}
