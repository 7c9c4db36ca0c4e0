pub mod errors;
mod layout;
pub mod name;
pub mod parser;
pub mod rdata;
pub mod record;
pub mod types;

pub use errors::{Result, ZoneError};
pub use parser::ZoneParser;
pub use rdata::{CharString, Field, RData};
pub use record::{ParsedRecord, RecordHeader};
pub use types::{RecordClass, RecordType};

/// Turns zone file text into an ordered sequence of records.
///
/// The grouping and projection code depends only on this trait, so any
/// zone grammar implementation (or a fixed list of records in tests) can
/// stand behind it.
pub trait ZoneReader {
    fn read(&self, content: &str, origin: Option<&str>) -> Result<Vec<ParsedRecord>>;
}

impl ZoneReader for ZoneParser {
    fn read(&self, content: &str, origin: Option<&str>) -> Result<Vec<ParsedRecord>> {
        self.parse(content, origin)
    }
}

/// Zone constants
pub mod constants {
    /// Default TTL if neither the record nor a directive sets one (1 hour)
    pub const DEFAULT_TTL: u32 = 3600;

    /// Maximum zone content size (10MB)
    pub const MAX_ZONE_FILE_SIZE: usize = 10 * 1024 * 1024;

    /// Maximum number of records a single $GENERATE may produce
    pub const MAX_GENERATED_RECORDS: u64 = 65536;
}
