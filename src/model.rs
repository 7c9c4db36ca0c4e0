//! Output model for the records and RRSets views.
//!
//! Each record (or RRSet) is projected into the generic header fields, its
//! canonical RDATA text and, for MX, SRV and TXT, structured sub-fields.

use crate::rrset::RRSet;
use crate::zone::name::fqdn;
use crate::zone::{ParsedRecord, RData, RecordHeader, RecordType};
use serde::Serialize;

/// One element of the records view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordModel {
    /// Name relative to the configured origin; `None` at the apex or
    /// without an origin.
    pub name: Option<String>,
    /// Fully qualified name with trailing dot.
    pub fqdn: String,
    pub class: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub ttl: u32,

    /// RDATA in canonical presentation format.
    pub data: String,
    pub mx: Option<MxModel>,
    pub srv: Option<SrvModel>,
    /// Concatenation of the record's character-strings.
    pub txt: Option<String>,
}

/// One element of the RRSets view.
///
/// `data` lines up index for index with the RRSet's members; `mx`, `srv`
/// and `txt` do too, and are `None` unless the RRSet has that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSetModel {
    pub name: Option<String>,
    pub fqdn: String,
    pub class: String,
    #[serde(rename = "type")]
    pub rtype: String,
    pub ttl: u32,

    pub data: Vec<String>,
    pub mx: Option<Vec<MxModel>>,
    pub srv: Option<Vec<SrvModel>>,
    pub txt: Option<Vec<String>>,
}

/// Parsed fields of an MX record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxModel {
    pub preference: u16,
    pub exchange: String,
}

/// Parsed fields of an SRV record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrvModel {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// Structured fields extracted from record data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredData {
    Mx(MxModel),
    Srv(SrvModel),
    Txt(String),
}

impl StructuredData {
    /// Structured fields for `rdata`, if its type has any.
    pub fn extract(rdata: &RData) -> Option<Self> {
        match rdata {
            RData::Mx {
                preference,
                exchange,
            } => Some(Self::Mx(MxModel {
                preference: *preference,
                exchange: exchange.clone(),
            })),
            RData::Srv {
                priority,
                weight,
                port,
                target,
            } => Some(Self::Srv(SrvModel {
                priority: *priority,
                weight: *weight,
                port: *port,
                target: target.clone(),
            })),
            RData::Txt(strings) => {
                let octets: Vec<u8> = strings
                    .iter()
                    .flat_map(|s| s.as_bytes().iter().copied())
                    .collect();
                Some(Self::Txt(String::from_utf8_lossy(&octets).into_owned()))
            }
            RData::A(_)
            | RData::Aaaa(_)
            | RData::Ns(_)
            | RData::Cname(_)
            | RData::Ptr(_)
            | RData::Dname(_)
            | RData::Spf(_)
            | RData::Soa { .. }
            | RData::Caa { .. }
            | RData::Fields { .. }
            | RData::Unknown { .. } => None,
        }
    }

    fn into_mx(self) -> Option<MxModel> {
        match self {
            Self::Mx(mx) => Some(mx),
            _ => None,
        }
    }

    fn into_srv(self) -> Option<SrvModel> {
        match self {
            Self::Srv(srv) => Some(srv),
            _ => None,
        }
    }

    fn into_txt(self) -> Option<String> {
        match self {
            Self::Txt(txt) => Some(txt),
            _ => None,
        }
    }
}

/// Name of `fqdn` relative to `origin`.
///
/// Returns `None` without an origin and at the apex. Names outside the
/// origin come back without their trailing dot.
pub fn relative_name(fqdn_name: &str, origin: Option<&str>) -> Option<String> {
    let origin = origin.filter(|o| !o.is_empty())?;
    let origin = fqdn(origin);
    let name = fqdn_name.strip_suffix(origin.as_str()).unwrap_or(fqdn_name);
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// RDATA columns of `record`'s presentation form.
pub fn rdata_text(record: &ParsedRecord) -> String {
    let full = record.to_string();
    let header = record.header().to_string();
    match full.strip_prefix(header.as_str()) {
        Some(data) => data.to_string(),
        None => record.rdata().to_string(),
    }
}

/// Header fields shared by both models
struct HeaderFields {
    name: Option<String>,
    fqdn: String,
    class: String,
    rtype: String,
    ttl: u32,
}

impl HeaderFields {
    fn project(header: &RecordHeader, origin: Option<&str>) -> Self {
        Self {
            name: relative_name(&header.name, origin),
            fqdn: header.name.clone(),
            class: header.class.to_string(),
            rtype: header.rtype.to_string(),
            ttl: header.ttl,
        }
    }
}

impl RecordModel {
    pub fn project(record: &ParsedRecord, origin: Option<&str>) -> Self {
        let HeaderFields {
            name,
            fqdn,
            class,
            rtype,
            ttl,
        } = HeaderFields::project(record.header(), origin);
        let structured = StructuredData::extract(record.rdata());

        Self {
            name,
            fqdn,
            class,
            rtype,
            ttl,
            data: rdata_text(record),
            mx: structured.clone().and_then(StructuredData::into_mx),
            srv: structured.clone().and_then(StructuredData::into_srv),
            txt: structured.and_then(StructuredData::into_txt),
        }
    }
}

impl RecordSetModel {
    pub fn project(rrset: &RRSet, origin: Option<&str>) -> Self {
        let HeaderFields {
            name,
            fqdn,
            class,
            rtype,
            ttl,
        } = HeaderFields::project(rrset.header(), origin);
        let members = rrset.records();
        let set_type = rrset.header().rtype;

        Self {
            name,
            fqdn,
            class,
            rtype,
            ttl,
            data: members.iter().map(rdata_text).collect(),
            mx: (set_type == RecordType::MX)
                .then(|| collect_structured(members, StructuredData::into_mx)),
            srv: (set_type == RecordType::SRV)
                .then(|| collect_structured(members, StructuredData::into_srv)),
            txt: (set_type == RecordType::TXT)
                .then(|| collect_structured(members, StructuredData::into_txt)),
        }
    }
}

fn collect_structured<T>(
    members: &[ParsedRecord],
    into: fn(StructuredData) -> Option<T>,
) -> Vec<T> {
    members
        .iter()
        .filter_map(|r| StructuredData::extract(r.rdata()).and_then(into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rrset::group_records;
    use crate::zone::{CharString, RecordClass};
    use std::net::Ipv4Addr;

    #[test]
    fn test_relative_name() {
        assert_eq!(relative_name("srv.main.test.", None), None);
        assert_eq!(relative_name("srv.main.test.", Some("")), None);
        assert_eq!(
            relative_name("srv.main.test.", Some("main.test.")),
            Some("srv".to_string())
        );
        assert_eq!(
            relative_name("a.b.main.test.", Some("main.test")),
            Some("a.b".to_string())
        );
        assert_eq!(relative_name("main.test.", Some("main.test")), None);
        assert_eq!(
            relative_name("other.test.", Some("main.test.")),
            Some("other.test".to_string())
        );
    }

    #[test]
    fn test_project_mx_record() {
        let record = ParsedRecord::new(
            "main.test.",
            RecordClass::IN,
            3600,
            RData::Mx {
                preference: 10,
                exchange: "mx1.mail.test.".to_string(),
            },
        );
        let model = RecordModel::project(&record, Some("main.test."));

        assert_eq!(model.name, None);
        assert_eq!(model.fqdn, "main.test.");
        assert_eq!(model.class, "IN");
        assert_eq!(model.rtype, "MX");
        assert_eq!(model.ttl, 3600);
        assert_eq!(model.data, "10 mx1.mail.test.");
        assert_eq!(
            model.mx,
            Some(MxModel {
                preference: 10,
                exchange: "mx1.mail.test.".to_string()
            })
        );
        assert_eq!(model.srv, None);
        assert_eq!(model.txt, None);
    }

    #[test]
    fn test_project_txt_concatenation() {
        let strings = ["and", " ", "second"]
            .iter()
            .flat_map(|s| CharString::split(s.as_bytes()))
            .collect();
        let record = ParsedRecord::new("txt.main.test.", RecordClass::IN, 300, RData::Txt(strings));
        let model = RecordModel::project(&record, Some("main.test."));

        assert_eq!(model.name.as_deref(), Some("txt"));
        assert_eq!(model.txt.as_deref(), Some("and second"));
        assert_eq!(model.data, r#""and" " " "second""#);
        assert_eq!(model.mx, None);
    }

    #[test]
    fn test_long_txt_concatenation_exceeds_single_string() {
        let long = "y".repeat(400);
        let record = ParsedRecord::new(
            "txt.main.test.",
            RecordClass::IN,
            300,
            RData::Txt(CharString::split(long.as_bytes())),
        );
        let model = RecordModel::project(&record, None);
        assert_eq!(model.txt.map(|t| t.len()), Some(400));
        assert_eq!(model.name, None);
    }

    #[test]
    fn test_project_rrset_lists() {
        let records = vec![
            ParsedRecord::new(
                "srv.main.test.",
                RecordClass::IN,
                1800,
                RData::Srv {
                    priority: 1,
                    weight: 1,
                    port: 443,
                    target: "app1.app.test.".to_string(),
                },
            ),
            ParsedRecord::new(
                "srv.main.test.",
                RecordClass::IN,
                1800,
                RData::Srv {
                    priority: 2,
                    weight: 1,
                    port: 443,
                    target: "app2.app.test.".to_string(),
                },
            ),
        ];
        let rrsets = group_records(records).unwrap();
        let model = RecordSetModel::project(&rrsets[0], Some("main.test"));

        assert_eq!(model.name.as_deref(), Some("srv"));
        assert_eq!(model.data, vec!["1 1 443 app1.app.test.", "2 1 443 app2.app.test."]);
        let srv = model.srv.unwrap();
        assert_eq!(srv.len(), 2);
        assert_eq!(srv[1].priority, 2);
        assert_eq!(srv[1].target, "app2.app.test.");
        assert_eq!(model.mx, None);
        assert_eq!(model.txt, None);
    }

    #[test]
    fn test_non_structured_rrset_has_no_lists() {
        let records = vec![ParsedRecord::new(
            "main.test.",
            RecordClass::IN,
            1800,
            RData::A(Ipv4Addr::new(10, 100, 0, 10)),
        )];
        let rrsets = group_records(records).unwrap();
        let model = RecordSetModel::project(&rrsets[0], Some("main.test."));
        assert_eq!(model.data, vec!["10.100.0.10"]);
        assert!(model.mx.is_none() && model.srv.is_none() && model.txt.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let record = ParsedRecord::new(
            "www.main.test.",
            RecordClass::IN,
            60,
            RData::A(Ipv4Addr::new(192, 0, 2, 1)),
        );
        let value = serde_json::to_value(RecordModel::project(&record, Some("main.test"))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "www",
                "fqdn": "www.main.test.",
                "class": "IN",
                "type": "A",
                "ttl": 60,
                "data": "192.0.2.1",
                "mx": null,
                "srv": null,
                "txt": null,
            })
        );
    }
}
