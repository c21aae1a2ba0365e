//! Financial summary service
//!
//! Read-only roll-ups over the transaction set: all-time totals, monthly
//! totals against a fixed opening balance, and the printable monthly report.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{DateRange, Jenis, Transaksi};
use crate::error::{AppError, AppResult};
use crate::store::RecordStore;

/// All-time totals. Missing sums are zero, never null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAllTime {
    pub total_masuk: Decimal,
    pub total_keluar: Decimal,
    pub saldo_kas: Decimal,
}

/// Monthly totals on top of the configured opening balance (kas awal).
/// There is no carry-forward across periods.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryBulanan {
    pub total_masuk: Decimal,
    pub total_keluar: Decimal,
    pub total_kas: Decimal,
}

pub async fn all_time(store: &dyn RecordStore) -> AppResult<SummaryAllTime> {
    let total_masuk = store.sum_jumlah(Jenis::Pemasukan, None).await?;
    let total_keluar = store.sum_jumlah(Jenis::Pengeluaran, None).await?;
    Ok(SummaryAllTime {
        total_masuk,
        total_keluar,
        saldo_kas: total_masuk - total_keluar,
    })
}

pub async fn bulanan(
    store: &dyn RecordStore,
    bulan: Option<&str>,
    tahun: Option<&str>,
    kas_awal: Decimal,
) -> AppResult<SummaryBulanan> {
    let today = Utc::now().date_naive();
    let bulan = match nonempty(bulan) {
        Some(v) => parse_bulan(v)?,
        None => today.month(),
    };
    let tahun = match nonempty(tahun) {
        Some(v) => parse_tahun(v)?,
        None => today.year(),
    };
    let range = month_range(tahun, bulan)?;

    let total_masuk = store.sum_jumlah(Jenis::Pemasukan, Some(range)).await?;
    let total_keluar = store.sum_jumlah(Jenis::Pengeluaran, Some(range)).await?;
    Ok(SummaryBulanan {
        total_masuk,
        total_keluar,
        total_kas: kas_awal + total_masuk - total_keluar,
    })
}

/// Monthly report: both arguments are required and validated before the
/// store is touched; transactions come back ascending by date.
pub async fn laporan(
    store: &dyn RecordStore,
    bulan: Option<&str>,
    tahun: Option<&str>,
) -> AppResult<Vec<Transaksi>> {
    let bulan = parse_bulan(nonempty(bulan).unwrap_or(""))?;
    let tahun = parse_tahun(nonempty(tahun).unwrap_or(""))?;
    let range = month_range(tahun, bulan)?;
    store.transaksi_in_range(range).await
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bulan(value: &str) -> AppResult<u32> {
    let bulan: u32 = value
        .parse()
        .map_err(|_| AppError::invalid_field("bulan", "must be an integer between 1 and 12"))?;
    if !(1..=12).contains(&bulan) {
        return Err(AppError::invalid_field(
            "bulan",
            "must be an integer between 1 and 12",
        ));
    }
    Ok(bulan)
}

fn parse_tahun(value: &str) -> AppResult<i32> {
    value
        .parse()
        .map_err(|_| AppError::invalid_field("tahun", "must be a valid year"))
}

/// `[first day of month, first day of next month)`
fn month_range(tahun: i32, bulan: u32) -> AppResult<DateRange> {
    let from = NaiveDate::from_ymd_opt(tahun, bulan, 1)
        .ok_or_else(|| AppError::invalid_field("tahun", "must be a valid year"))?;
    let to = if bulan == 12 {
        NaiveDate::from_ymd_opt(tahun + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(tahun, bulan + 1, 1)
    }
    .ok_or_else(|| AppError::invalid_field("tahun", "must be a valid year"))?;
    Ok(DateRange { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransaksiData;
    use crate::store::MemStore;
    use rust_decimal_macros::dec;

    async fn seed(store: &MemStore, jenis: Jenis, jumlah: Decimal, tanggal: &str) {
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

    #[test]
    fn month_range_handles_year_wrap_and_leap_february() {
        let dec_range = month_range(2024, 12).unwrap();
        assert_eq!(dec_range.from, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(dec_range.to, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let feb = month_range(2024, 2).unwrap();
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[tokio::test]
    async fn all_time_on_empty_store_is_zeroes() {
        let store = MemStore::new();
        let summary = all_time(&store).await.unwrap();
        assert_eq!(summary.total_masuk, Decimal::ZERO);
        assert_eq!(summary.total_keluar, Decimal::ZERO);
        assert_eq!(summary.saldo_kas, Decimal::ZERO);
    }

    #[tokio::test]
    async fn all_time_nets_income_against_expense() {
        let store = MemStore::new();
        seed(&store, Jenis::Pemasukan, dec!(1000), "2024-01-10").await;
        seed(&store, Jenis::Pengeluaran, dec!(350), "2024-02-11").await;

        let summary = all_time(&store).await.unwrap();
        assert_eq!(summary.total_masuk, dec!(1000));
        assert_eq!(summary.total_keluar, dec!(350));
        assert_eq!(summary.saldo_kas, dec!(650));
    }

    #[tokio::test]
    async fn bulanan_is_limited_to_the_requested_month() {
        let store = MemStore::new();
        seed(&store, Jenis::Pemasukan, dec!(500), "2024-03-05").await;
        seed(&store, Jenis::Pengeluaran, dec!(200), "2024-03-20").await;
        seed(&store, Jenis::Pemasukan, dec!(999), "2024-04-01").await;

        let summary = bulanan(&store, Some("3"), Some("2024"), dec!(100000000))
            .await
            .unwrap();
        assert_eq!(summary.total_masuk, dec!(500));
        assert_eq!(summary.total_keluar, dec!(200));
        assert_eq!(summary.total_kas, dec!(100000300));
    }

    #[tokio::test]
    async fn bulanan_rejects_out_of_range_month() {
        let store = MemStore::new();
        let err = bulanan(&store, Some("0"), Some("2024"), Decimal::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn laporan_requires_valid_arguments() {
        let store = MemStore::new();
        assert!(matches!(
            laporan(&store, Some("13"), Some("2024")).await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert!(matches!(
            laporan(&store, None, Some("2024")).await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert!(matches!(
            laporan(&store, Some("2"), Some("tahun-ini"))
                .await
                .unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn laporan_returns_only_the_month_ascending() {
        let store = MemStore::new();
        seed(&store, Jenis::Pengeluaran, dec!(50), "2024-02-20").await;
        seed(&store, Jenis::Pemasukan, dec!(100), "2024-02-01").await;
        seed(&store, Jenis::Pemasukan, dec!(77), "2024-01-31").await;
        seed(&store, Jenis::Pemasukan, dec!(88), "2024-03-01").await;

        let rows = laporan(&store, Some("2"), Some("2024")).await.unwrap();
        let dates: Vec<String> = rows.iter().map(|t| t.tanggal.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-01", "2024-02-20"]);
    }
}
