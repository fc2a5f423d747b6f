//! CSV price history adapter.
//!
//! Reads the market-data export layout `Date,Close/Last,Volume,Open,High,Low`.
//! Columns are located by header name, prices may carry a `$` prefix and
//! dates may be `MM/DD/YYYY` or `YYYY-MM-DD`.

use crate::domain::error::TradebotError;
use crate::domain::record::PriceRecord;
use crate::ports::data_port::RecordSource;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

pub struct CsvRecordSource {
    path: PathBuf,
}

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    close: usize,
    volume: usize,
    open: usize,
    high: usize,
    low: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, TradebotError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
                .ok_or_else(|| TradebotError::Data {
                    reason: format!("missing {} column", names[0]),
                })
        };
        Ok(Self {
            date: find(&["Date"])?,
            close: find(&["Close/Last", "Close"])?,
            volume: find(&["Volume"])?,
            open: find(&["Open"])?,
            high: find(&["High"])?,
            low: find(&["Low"])?,
        })
    }
}

impl CsvRecordSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in file order, each validated.
    pub fn read_all(&self) -> Result<Vec<PriceRecord>, TradebotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| TradebotError::Data {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| TradebotError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row.map_err(|e| TradebotError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let record = parse_row(&row, &columns)?;
            record.validate()?;
            records.push(record);
        }

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "price history loaded"
        );
        Ok(records)
    }
}

fn parse_row(row: &csv::StringRecord, columns: &Columns) -> Result<PriceRecord, TradebotError> {
    let raw_date = row.get(columns.date).unwrap_or_default();
    let corrupt = |reason: String| TradebotError::CorruptRecord {
        date: raw_date.to_string(),
        reason,
    };

    let date = parse_date(raw_date).ok_or_else(|| corrupt("unrecognized date".into()))?;
    let price = |index: usize, name: &str| -> Result<f64, TradebotError> {
        let raw = row.get(index).unwrap_or_default();
        parse_price(raw).ok_or_else(|| corrupt(format!("invalid {} value '{}'", name, raw)))
    };

    let volume = row.get(columns.volume).unwrap_or_default();
    if volume.is_empty() {
        return Err(corrupt("empty volume".into()));
    }

    Ok(PriceRecord {
        date,
        open: price(columns.open, "open")?,
        high: price(columns.high, "high")?,
        low: price(columns.low, "low")?,
        close: price(columns.close, "close")?,
        volume: volume.to_string(),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.strip_prefix('$').unwrap_or(raw).trim().parse().ok()
}

impl RecordSource for CsvRecordSource {
    fn fetch_records(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceRecord>, TradebotError> {
        let mut records = self.read_all()?;
        records.retain(|r| {
            start.is_none_or(|s| r.date >= s) && end.is_none_or(|e| r.date <= e)
        });
        Ok(records)
    }

    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradebotError> {
        let records = self.read_all()?;
        let first = records.iter().map(|r| r.date).min();
        let last = records.iter().map(|r| r.date).max();
        Ok(first.zip(last).map(|(first, last)| (first, last, records.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXPORT: &str = "Date,Close/Last,Volume,Open,High,Low\n\
        08/13/2021,$150.50,1000,$149.00,$151.00,$148.50\n\
        08/12/2021,$149.00,1200,$147.00,$149.50,$146.80\n\
        08/11/2021,$147.25,900,$148.00,$148.40,$146.90\n";

    fn write_csv(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_export_layout() {
        let (_dir, path) = write_csv(EXPORT);
        let records = CsvRecordSource::new(&path).fetch_records(None, None).unwrap();

        assert_eq!(records.len(), 3);
        // file order is kept; the engine sorts
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2021, 8, 13).unwrap());
        assert_eq!(records[0].close, 150.5);
        assert_eq!(records[0].open, 149.0);
        assert_eq!(records[0].high, 151.0);
        assert_eq!(records[0].low, 148.5);
        assert_eq!(records[0].volume, "1000");
    }

    #[test]
    fn columns_found_by_name() {
        let (_dir, path) = write_csv(
            "Open, High, Low, Close, Volume, Date\n\
             10.0, 11.0, 9.5, 10.5, N/A, 2021-08-02\n",
        );
        let records = CsvRecordSource::new(&path).fetch_records(None, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2021, 8, 2).unwrap());
        assert_eq!(records[0].close, 10.5);
        assert_eq!(records[0].volume, "N/A");
    }

    #[test]
    fn fetch_filters_by_date() {
        let (_dir, path) = write_csv(EXPORT);
        let day = NaiveDate::from_ymd_opt(2021, 8, 12);
        let records = CsvRecordSource::new(&path).fetch_records(day, day).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].close, 149.0);
    }

    #[test]
    fn data_range_spans_file() {
        let (_dir, path) = write_csv(EXPORT);
        let range = CsvRecordSource::new(&path).data_range().unwrap();
        assert_eq!(
            range,
            Some((
                NaiveDate::from_ymd_opt(2021, 8, 11).unwrap(),
                NaiveDate::from_ymd_opt(2021, 8, 13).unwrap(),
                3
            ))
        );
    }

    #[test]
    fn empty_file_has_no_range() {
        let (_dir, path) = write_csv("Date,Close/Last,Volume,Open,High,Low\n");
        assert_eq!(CsvRecordSource::new(&path).data_range().unwrap(), None);
    }

    #[test]
    fn missing_column_fails() {
        let (_dir, path) = write_csv("Date,Close/Last,Volume,Open,High\n");
        let err = CsvRecordSource::new(&path).read_all().unwrap_err();
        assert!(matches!(err, TradebotError::Data { ref reason } if reason.contains("Low")));
    }

    #[test]
    fn high_below_low_is_corrupt() {
        let (_dir, path) = write_csv(
            "Date,Close/Last,Volume,Open,High,Low\n\
             08/13/2021,$150.50,1000,$149.00,$140.00,$148.50\n",
        );
        let err = CsvRecordSource::new(&path).read_all().unwrap_err();
        assert!(matches!(err, TradebotError::CorruptRecord { .. }));
    }

    #[test]
    fn bad_values_are_corrupt() {
        let (_dir, path) = write_csv(
            "Date,Close/Last,Volume,Open,High,Low\n\
             yesterday,$150.50,1000,$149.00,$151.00,$148.50\n",
        );
        assert!(matches!(
            CsvRecordSource::new(&path).read_all(),
            Err(TradebotError::CorruptRecord { .. })
        ));

        let (_dir, path) = write_csv(
            "Date,Close/Last,Volume,Open,High,Low\n\
             08/13/2021,abc,1000,$149.00,$151.00,$148.50\n",
        );
        assert!(matches!(
            CsvRecordSource::new(&path).read_all(),
            Err(TradebotError::CorruptRecord { ref reason, .. }) if reason.contains("close")
        ));

        let (_dir, path) = write_csv(
            "Date,Close/Last,Volume,Open,High,Low\n\
             08/13/2021,$150.50,,$149.00,$151.00,$148.50\n",
        );
        assert!(matches!(
            CsvRecordSource::new(&path).read_all(),
            Err(TradebotError::CorruptRecord { ref reason, .. }) if reason.contains("volume")
        ));
    }

    #[test]
    fn missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let source = CsvRecordSource::new(dir.path().join("absent.csv"));
        assert!(matches!(source.read_all(), Err(TradebotError::Data { .. })));
    }
}
