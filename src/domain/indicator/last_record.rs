//! Passthrough of the most recent record.

use crate::domain::record::PriceRecord;

#[derive(Debug, Clone, Default)]
pub struct LastRecord {
    value: Option<PriceRecord>,
}

impl LastRecord {
    pub fn update(&mut self, record: &PriceRecord) {
        self.value = Some(record.clone());
    }

    pub fn value(&self) -> Option<&PriceRecord> {
        self.value.as_ref()
    }
}
