use super::rdata::RData;
use super::types::{RecordClass, RecordType};
use std::fmt;

/// The owner, class, type and TTL shared by a record or an RRSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Fully-qualified owner name, always dot-terminated
    pub name: String,
    pub class: RecordClass,
    pub rtype: RecordType,
    /// Time to live in seconds
    pub ttl: u32,
}

impl fmt::Display for RecordHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t",
            self.name, self.ttl, self.class, self.rtype
        )
    }
}

/// A single resource record as read from a zone file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    header: RecordHeader,
    rdata: RData,
}

impl ParsedRecord {
    /// Create a record; the header's type is taken from `rdata`.
    pub fn new(name: impl Into<String>, class: RecordClass, ttl: u32, rdata: RData) -> Self {
        Self {
            header: RecordHeader {
                name: name.into(),
                class,
                rtype: rdata.rtype(),
                ttl,
            },
            rdata,
        }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn class(&self) -> RecordClass {
        self.header.class
    }

    pub fn rtype(&self) -> RecordType {
        self.header.rtype
    }

    pub fn ttl(&self) -> u32 {
        self.header.ttl
    }

    pub fn rdata(&self) -> &RData {
        &self.rdata
    }
}

/// Full presentation form: the header columns followed by the RDATA.
impl fmt::Display for ParsedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header, self.rdata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_record_presentation() {
        let record = ParsedRecord::new(
            "main.test.",
            RecordClass::IN,
            1800,
            RData::A(Ipv4Addr::new(10, 100, 0, 10)),
        );
        assert_eq!(record.rtype(), RecordType::A);
        assert_eq!(record.header().to_string(), "main.test.\t1800\tIN\tA\t");
        assert_eq!(record.to_string(), "main.test.\t1800\tIN\tA\t10.100.0.10");
    }
}
