//! Grouping of records into RRSets.
//!
//! Groups keep the order in which their first member appears in the input,
//! and members keep their relative input order. A key-to-position index sits
//! next to the ordered list so the ordering never depends on hash iteration.

use crate::zone::{ParsedRecord, RecordClass, RecordHeader, RecordType};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Grouping errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Members of one RRSet disagree on TTL (RFC 2181 section 5.2)
    #[error(
        "inconsistent TTLs between {class} {rtype} {name} records ({expected} vs. {found}); see RFC 2181 section 5.2"
    )]
    InconsistentTtl {
        class: RecordClass,
        rtype: RecordType,
        name: String,
        /// TTL of the RRSet's first record
        expected: u32,
        /// TTL of the offending record
        found: u32,
    },
}

/// Identity of an RRSet: owner name, class and type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RRSetKey {
    pub name: String,
    pub class: RecordClass,
    pub rtype: RecordType,
}

impl RRSetKey {
    pub fn of(record: &ParsedRecord) -> Self {
        Self {
            name: record.name().to_string(),
            class: record.class(),
            rtype: record.rtype(),
        }
    }
}

/// Records sharing owner name, class and type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RRSet {
    /// Header of the first record seen for this key
    header: RecordHeader,
    records: Vec<ParsedRecord>,
}

impl RRSet {
    fn new(first: ParsedRecord) -> Self {
        Self {
            header: first.header().clone(),
            records: vec![first],
        }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    /// Members in input order
    pub fn records(&self) -> &[ParsedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First member whose TTL differs from the header's
    fn ttl_conflict(&self) -> Option<&ParsedRecord> {
        self.records.iter().find(|r| r.ttl() != self.header.ttl)
    }
}

/// Partition `records` into RRSets
///
/// Fails for the whole input if any RRSet has members with differing TTLs;
/// no RRSets are returned in that case.
pub fn group_records(
    records: impl IntoIterator<Item = ParsedRecord>,
) -> Result<Vec<RRSet>, GroupError> {
    let mut rrsets: Vec<RRSet> = Vec::new();
    let mut indices: FxHashMap<RRSetKey, usize> = FxHashMap::default();

    for record in records {
        let key = RRSetKey::of(&record);
        match indices.get(&key) {
            Some(&i) => rrsets[i].records.push(record),
            None => {
                indices.insert(key, rrsets.len());
                rrsets.push(RRSet::new(record));
            }
        }
    }

    for rrset in &rrsets {
        if let Some(conflict) = rrset.ttl_conflict() {
            let header = &rrset.header;
            debug!(
                "RRSet {} {} {} has conflicting TTLs {} and {}",
                header.class,
                header.rtype,
                header.name,
                header.ttl,
                conflict.ttl()
            );
            return Err(GroupError::InconsistentTtl {
                class: header.class,
                rtype: header.rtype,
                name: header.name.clone(),
                expected: header.ttl,
                found: conflict.ttl(),
            });
        }
    }

    debug!("Grouped records into {} RRSets", rrsets.len());
    Ok(rrsets)
}
