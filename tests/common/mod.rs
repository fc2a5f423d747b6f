#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use tradebot::domain::error::TradebotError;
use tradebot::domain::record::PriceRecord;
use tradebot::ports::data_port::RecordSource;

pub struct MockRecordSource {
    pub records: Vec<PriceRecord>,
    pub error: Option<String>,
}

impl MockRecordSource {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(reason.to_string()),
        }
    }

    fn check(&self) -> Result<(), TradebotError> {
        match &self.error {
            Some(reason) => Err(TradebotError::Data {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl RecordSource for MockRecordSource {
    fn fetch_records(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceRecord>, TradebotError> {
        self.check()?;
        Ok(self
            .records
            .iter()
            .filter(|r| start.is_none_or(|s| r.date >= s) && end.is_none_or(|e| r.date <= e))
            .cloned()
            .collect())
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradebotError> {
        self.check()?;
        let first = self.records.iter().map(|r| r.date).min();
        let last = self.records.iter().map(|r| r.date).max();
        Ok(first.zip(last).map(|(f, l)| (f, l, self.records.len())))
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
}

pub fn make_record(date: NaiveDate, close: f64) -> PriceRecord {
    PriceRecord {
        date,
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: "100000".to_string(),
    }
}

/// One record per day from [`start_date`], oldest first.
pub fn series(closes: &[f64]) -> Vec<PriceRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_record(start_date() + Duration::days(i as i64), close))
        .collect()
}

pub fn rising(n: usize, from: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| from + step * i as f64).collect()
}

pub fn falling(n: usize, from: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| from - step * i as f64).collect()
}

/// Deterministic up-and-down series that keeps every RSI strategy busy.
pub fn oscillating(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * ((i as f64) * 0.7).sin() + (i % 3) as f64)
        .collect()
}

/// Renders records in the newest-first market-data export layout.
pub fn export_csv(records: &[PriceRecord]) -> String {
    let mut out = String::from("Date,Close/Last,Volume,Open,High,Low\n");
    for r in records.iter().rev() {
        out.push_str(&format!(
            "{},${:.4},{},${:.4},${:.4},${:.4}\n",
            r.date.format("%m/%d/%Y"),
            r.close,
            r.volume,
            r.open,
            r.high,
            r.low
        ));
    }
    out
}
