use super::types::RecordType;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Maximum length of a single character-string in octets.
pub const MAX_CHAR_STRING_LEN: usize = 255;

/// A DNS character-string (RFC 1035 section 3.3), at most 255 octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharString(Vec<u8>);

impl CharString {
    /// Splits `octets` into as many character-strings as needed.
    ///
    /// An empty input yields a single empty string.
    pub fn split(octets: &[u8]) -> Vec<CharString> {
        if octets.is_empty() {
            return vec![CharString(Vec::new())];
        }
        octets
            .chunks(MAX_CHAR_STRING_LEN)
            .map(|chunk| CharString(chunk.to_vec()))
            .collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted(f, &self.0)
    }
}

/// Writes `octets` as a quoted string with `\"`, `\\` and `\DDD` escapes.
pub(super) fn write_quoted(f: &mut fmt::Formatter<'_>, octets: &[u8]) -> fmt::Result {
    f.write_str("\"")?;
    for &b in octets {
        match b {
            b'"' | b'\\' => write!(f, "\\{}", b as char)?,
            0x20..=0x7e => write!(f, "{}", b as char)?,
            _ => write!(f, "\\{:03}", b)?,
        }
    }
    f.write_str("\"")
}

/// One presentation field of a record parsed by field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Fully-qualified domain name
    Name(String),
    /// Quoted text
    Text(Vec<u8>),
    /// Number, mnemonic, timestamp or encoded blob in normalized form
    Token(String),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name(name) => f.write_str(name),
            Field::Text(octets) => write_quoted(f, octets),
            Field::Token(token) => f.write_str(token),
        }
    }
}

/// Record data, one variant per supported layout.
///
/// `Fields` carries the remaining known types as a list of normalized
/// presentation fields; `Unknown` carries RFC 3597 generic data. Neither is
/// used for a type that has its own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Ns(String),
    Cname(String),
    Ptr(String),
    Dname(String),
    Mx {
        preference: u16,
        exchange: String,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Txt(Vec<CharString>),
    Spf(Vec<CharString>),
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    },
    Caa {
        flags: u8,
        tag: String,
        value: Vec<u8>,
    },
    Fields {
        rtype: RecordType,
        fields: Vec<Field>,
    },
    Unknown {
        rtype: RecordType,
        data: Vec<u8>,
    },
}

impl RData {
    /// The record type this data belongs to.
    pub fn rtype(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::Aaaa(_) => RecordType::AAAA,
            RData::Ns(_) => RecordType::NS,
            RData::Cname(_) => RecordType::CNAME,
            RData::Ptr(_) => RecordType::PTR,
            RData::Dname(_) => RecordType::DNAME,
            RData::Mx { .. } => RecordType::MX,
            RData::Srv { .. } => RecordType::SRV,
            RData::Txt(_) => RecordType::TXT,
            RData::Spf(_) => RecordType::SPF,
            RData::Soa { .. } => RecordType::SOA,
            RData::Caa { .. } => RecordType::CAA,
            RData::Fields { rtype, .. } | RData::Unknown { rtype, .. } => *rtype,
        }
    }

    /// Whether `rtype` is parsed into a dedicated variant.
    pub fn has_dedicated_variant(rtype: RecordType) -> bool {
        matches!(
            rtype,
            RecordType::A
                | RecordType::AAAA
                | RecordType::NS
                | RecordType::CNAME
                | RecordType::PTR
                | RecordType::DNAME
                | RecordType::MX
                | RecordType::SRV
                | RecordType::TXT
                | RecordType::SPF
                | RecordType::SOA
                | RecordType::CAA
        )
    }
}

fn write_strings(f: &mut fmt::Formatter<'_>, strings: &[CharString]) -> fmt::Result {
    for (i, s) in strings.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", s)?;
    }
    Ok(())
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::Aaaa(addr) => write!(f, "{}", addr),
            RData::Ns(name) | RData::Cname(name) | RData::Ptr(name) | RData::Dname(name) => {
                f.write_str(name)
            }
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::Srv {
                priority,
                weight,
                port,
                target,
            } => write!(f, "{} {} {} {}", priority, weight, port, target),
            RData::Txt(strings) | RData::Spf(strings) => write_strings(f, strings),
            RData::Soa {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => write!(
                f,
                "{} {} {} {} {} {} {}",
                mname, rname, serial, refresh, retry, expire, minimum
            ),
            RData::Caa { flags, tag, value } => {
                write!(f, "{} {} ", flags, tag)?;
                write_quoted(f, value)
            }
            RData::Fields { fields, .. } => {
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", field)?;
                }
                Ok(())
            }
            RData::Unknown { data, .. } => {
                if data.is_empty() {
                    f.write_str("\\# 0")
                } else {
                    write!(f, "\\# {} {}", data.len(), hex::encode(data))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_string_escaping() {
        let s = CharString(b"say \"hi\" \\ \x01".to_vec());
        assert_eq!(s.to_string(), r#""say \"hi\" \\ \001""#);
    }

    #[test]
    fn test_char_string_split() {
        let long = vec![b'x'; 300];
        let parts = CharString::split(&long);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].as_bytes().len(), 255);
        assert_eq!(parts[1].as_bytes().len(), 45);
        assert_eq!(CharString::split(b"").len(), 1);
    }

    #[test]
    fn test_presentation() {
        let mx = RData::Mx {
            preference: 10,
            exchange: "mx1.mail.test.".to_string(),
        };
        assert_eq!(mx.to_string(), "10 mx1.mail.test.");
        assert_eq!(mx.rtype(), RecordType::MX);

        let txt = RData::Txt(vec![
            CharString(b"and".to_vec()),
            CharString(b" ".to_vec()),
            CharString(b"second".to_vec()),
        ]);
        assert_eq!(txt.to_string(), r#""and" " " "second""#);

        let unknown = RData::Unknown {
            rtype: RecordType::Unknown(65280),
            data: vec![0xab, 0xcd],
        };
        assert_eq!(unknown.to_string(), "\\# 2 abcd");

        let caa = RData::Caa {
            flags: 0,
            tag: "issue".to_string(),
            value: b"letsencrypt.org".to_vec(),
        };
        assert_eq!(caa.to_string(), r#"0 issue "letsencrypt.org""#);

        let hinfo = RData::Fields {
            rtype: RecordType::HINFO,
            fields: vec![Field::Text(b"INTEL".to_vec()), Field::Text(b"LINUX".to_vec())],
        };
        assert_eq!(hinfo.to_string(), r#""INTEL" "LINUX""#);

        let afsdb = RData::Fields {
            rtype: RecordType::AFSDB,
            fields: vec![
                Field::Token("1".to_string()),
                Field::Name("afs.main.test.".to_string()),
            ],
        };
        assert_eq!(afsdb.to_string(), "1 afs.main.test.");
        assert_eq!(afsdb.rtype(), RecordType::AFSDB);
    }
}
