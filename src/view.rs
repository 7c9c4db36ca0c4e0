//! The records and RRSets views over a zone file.
//!
//! Both views start from the same reader output. Either view returns a
//! complete result or an error, never a partial list.

use crate::error::Result;
use crate::model::{RecordModel, RecordSetModel};
use crate::rrset::group_records;
use crate::zone::{ZoneParser, ZoneReader};
use serde::Serialize;
use tracing::debug;

/// The records view with the origin it was read under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordsDocument {
    pub origin: Option<String>,
    pub records: Vec<RecordModel>,
}

/// The RRSets view with the origin it was read under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSetsDocument {
    pub origin: Option<String>,
    pub rrsets: Vec<RecordSetModel>,
}

/// Reads zone content through `R` and projects it.
#[derive(Debug, Clone, Default)]
pub struct ZoneView<R = ZoneParser> {
    reader: R,
}

impl<R: ZoneReader> ZoneView<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// One model per record, in file order
    pub fn records(&self, content: &str, origin: Option<&str>) -> Result<Vec<RecordModel>> {
        let records = self.reader.read(content, origin)?;
        debug!("Projecting {} records", records.len());

        Ok(records
            .iter()
            .map(|record| RecordModel::project(record, origin))
            .collect())
    }

    /// One model per RRSet, in order of each RRSet's first record
    ///
    /// Fails if any RRSet has records with different TTLs.
    pub fn record_sets(&self, content: &str, origin: Option<&str>) -> Result<Vec<RecordSetModel>> {
        let records = self.reader.read(content, origin)?;
        let rrsets = group_records(records)?;
        debug!("Projecting {} RRSets", rrsets.len());

        Ok(rrsets
            .iter()
            .map(|rrset| RecordSetModel::project(rrset, origin))
            .collect())
    }

    pub fn records_document(&self, content: &str, origin: Option<&str>) -> Result<RecordsDocument> {
        Ok(RecordsDocument {
            origin: origin.map(str::to_string),
            records: self.records(content, origin)?,
        })
    }

    pub fn record_sets_document(
        &self,
        content: &str,
        origin: Option<&str>,
    ) -> Result<RecordSetsDocument> {
        Ok(RecordSetsDocument {
            origin: origin.map(str::to_string),
            rrsets: self.record_sets(content, origin)?,
        })
    }
}

/// Records view using the default zone parser
pub fn read_records(content: &str, origin: Option<&str>) -> Result<Vec<RecordModel>> {
    ZoneView::<ZoneParser>::default().records(content, origin)
}

/// RRSets view using the default zone parser
pub fn read_record_sets(content: &str, origin: Option<&str>) -> Result<Vec<RecordSetModel>> {
    ZoneView::<ZoneParser>::default().record_sets(content, origin)
}
