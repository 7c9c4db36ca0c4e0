pub mod config;
pub mod error;
pub mod model;
pub mod rrset;
pub mod view;
pub mod zone;

pub use error::{Result, ZonefileError};
pub use model::{RecordModel, RecordSetModel};
pub use rrset::{RRSet, group_records};
pub use view::{ZoneView, read_record_sets, read_records};
pub use zone::{ParsedRecord, ZoneParser, ZoneReader};
