//! Domain module
//!
//! Entities, validated form input and shared value types.

mod entities;
mod forms;

pub use entities::{
    Jadwal, JadwalData, Jemaat, JemaatData, Jenis, NewUser, Renungan, RenunganData, Transaksi,
    TransaksiData, User, UserInfo,
};
pub use forms::{
    parse_flag, parse_jumlah, parse_tanggal, validate_jadwal_create, validate_jadwal_update,
    validate_jemaat_create, validate_jemaat_update, validate_renungan_create,
    validate_renungan_update, validate_transaksi_create, validate_transaksi_update, ImagePatch,
    JadwalDraft, JadwalPatch, JemaatDraft, JemaatPatch, RenunganDraft, RenunganPatch,
    TransaksiDraft, TransaksiPatch,
};

use chrono::NaiveDate;

/// Half-open date window `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to
    }
}
