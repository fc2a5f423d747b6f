//! Price record source port trait.

use crate::domain::error::TradebotError;
use crate::domain::record::PriceRecord;
use chrono::NaiveDate;

pub trait RecordSource {
    /// Records dated within `[start, end]`, in whatever order the source holds them.
    fn fetch_records(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceRecord>, TradebotError>;

    /// First date, last date and record count, or `None` for an empty source.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TradebotError>;
}
