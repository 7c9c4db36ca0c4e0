//! Field layouts for record types without a dedicated `RData` variant.
//!
//! Each layout lists the presentation fields of a type in order. Names are
//! made absolute against the origin, numbers and mnemonics are re-rendered,
//! and encoded blobs are decoded and re-encoded, so the rendered RDATA does
//! not depend on how the zone file spelled it.

use super::name::absolute_name;
use super::parser::{Token, unescape};
use super::rdata::{Field, MAX_CHAR_STRING_LEN};
use super::types::RecordType;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, NaiveDateTime};

/// Timestamp form used by RRSIG presentation (RFC 4034 section 3.2)
const SIGNATURE_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// One presentation field of a layout.
///
/// `Hex`, `Base64`, `TypeList` and `SvcParams` take all remaining tokens
/// and only appear last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Slot {
    Name,
    /// Character-string, at most 255 octets
    Text,
    /// Quoted string without the character-string length limit
    LongText,
    U8,
    U16,
    U32,
    /// Record type mnemonic
    Type,
    /// Mnemonic or number kept as written, uppercased
    Mnemonic,
    /// RRSIG expiration or inception
    Time,
    /// NSEC3 salt: hex or `-`
    Salt,
    /// NSEC3 next hashed owner, base32 with the extended hex alphabet
    Base32Hex,
    Hex,
    Base64,
    TypeList,
    SvcParams,
}

/// Field layout for `rtype`, or `None` if the type has no supported
/// presentation form.
pub(super) fn of(rtype: RecordType) -> Option<&'static [Slot]> {
    use Slot::*;

    let layout: &'static [Slot] = match rtype {
        RecordType::HINFO => &[Text, Text],
        RecordType::RP => &[Name, Name],
        RecordType::AFSDB => &[U16, Name],
        RecordType::NAPTR => &[U16, U16, Text, Text, Text, Name],
        RecordType::CERT => &[Mnemonic, U16, Mnemonic, Base64],
        RecordType::DS | RecordType::CDS => &[U16, U8, U8, Hex],
        RecordType::SSHFP => &[U8, U8, Hex],
        RecordType::RRSIG => &[Type, U8, U8, U32, Time, Time, U16, Name, Base64],
        RecordType::NSEC => &[Name, TypeList],
        RecordType::DNSKEY | RecordType::CDNSKEY => &[U16, U8, U8, Base64],
        RecordType::DHCID | RecordType::OPENPGPKEY => &[Base64],
        RecordType::NSEC3 => &[U8, U8, U16, Salt, Base32Hex, TypeList],
        RecordType::NSEC3PARAM => &[U8, U8, U16, Salt],
        RecordType::TLSA | RecordType::SMIMEA => &[U8, U8, U8, Hex],
        RecordType::CSYNC => &[U32, U16, TypeList],
        RecordType::ZONEMD => &[U32, U8, U8, Hex],
        RecordType::SVCB | RecordType::HTTPS => &[U16, Name, SvcParams],
        RecordType::URI => &[U16, U16, LongText],
        _ => return None,
    };
    Some(layout)
}

/// Parse `tokens` according to `layout`.
pub(super) fn parse(
    rtype: RecordType,
    layout: &[Slot],
    tokens: &[Token],
    origin: Option<&str>,
) -> Result<Vec<Field>, String> {
    let mut fields = Vec::with_capacity(layout.len());
    let mut rest = tokens;

    for slot in layout {
        match slot {
            Slot::Hex | Slot::Base64 => {
                fields.push(Field::Token(parse_blob(*slot, rest)?));
                rest = &[];
            }
            Slot::TypeList => {
                let types = rest
                    .iter()
                    .map(|t| t.text.parse::<RecordType>().map(|rt| rt.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                if !types.is_empty() {
                    fields.push(Field::Token(types.join(" ")));
                }
                rest = &[];
            }
            Slot::SvcParams => {
                fields.extend(parse_svc_params(rest)?.into_iter().map(Field::Token));
                rest = &[];
            }
            _ => {
                let (token, tail) = rest.split_first().ok_or_else(|| {
                    format!(
                        "{} record requires {} fields, got {}",
                        rtype,
                        layout.len(),
                        tokens.len()
                    )
                })?;
                fields.push(parse_single(*slot, token, origin)?);
                rest = tail;
            }
        }
    }

    if !rest.is_empty() {
        return Err(format!(
            "{} record has {} unexpected trailing fields",
            rtype,
            rest.len()
        ));
    }
    Ok(fields)
}

fn parse_single(slot: Slot, token: &Token, origin: Option<&str>) -> Result<Field, String> {
    let text = token.text.as_str();
    let field = match slot {
        Slot::Name => Field::Name(absolute_name(text, origin)?),
        Slot::Text => {
            let octets = unescape(text)?;
            if octets.len() > MAX_CHAR_STRING_LEN {
                return Err(format!(
                    "character-string of {} octets exceeds {}",
                    octets.len(),
                    MAX_CHAR_STRING_LEN
                ));
            }
            Field::Text(octets)
        }
        Slot::LongText => Field::Text(unescape(text)?),
        Slot::U8 => Field::Token(number::<u8>(text)?),
        Slot::U16 => Field::Token(number::<u16>(text)?),
        Slot::U32 => Field::Token(number::<u32>(text)?),
        Slot::Type => Field::Token(text.parse::<RecordType>()?.to_string()),
        Slot::Mnemonic => {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(format!("invalid mnemonic '{}'", text));
            }
            Field::Token(text.to_ascii_uppercase())
        }
        Slot::Time => Field::Token(signature_time(text)?),
        Slot::Salt => {
            if text == "-" {
                Field::Token("-".to_string())
            } else {
                let salt = hex::decode(text).map_err(|_| format!("invalid salt '{}'", text))?;
                Field::Token(hex::encode_upper(salt))
            }
        }
        Slot::Base32Hex => {
            let octets = base32::decode(base32_hex(), &text.to_ascii_uppercase())
                .filter(|octets| !octets.is_empty())
                .ok_or_else(|| format!("invalid base32 hash '{}'", text))?;
            Field::Token(base32::encode(base32_hex(), &octets).to_lowercase())
        }
        Slot::Hex | Slot::Base64 | Slot::TypeList | Slot::SvcParams => {
            return Err("field must be last".to_string());
        }
    };
    Ok(field)
}

/// RFC 4648 extended hex alphabet used by NSEC3
fn base32_hex() -> base32::Alphabet {
    base32::Alphabet::Rfc4648Hex { padding: false }
}

fn number<T: std::str::FromStr + ToString>(text: &str) -> Result<String, String> {
    text.parse::<T>()
        .map(|n| n.to_string())
        .map_err(|_| format!("invalid number '{}'", text))
}

/// Concatenate the remaining tokens and normalize the encoding
fn parse_blob(slot: Slot, tokens: &[Token]) -> Result<String, String> {
    let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
    if text.is_empty() {
        return Err("missing encoded data".to_string());
    }

    if slot == Slot::Hex {
        let octets = hex::decode(&text).map_err(|e| format!("invalid hex '{}': {}", text, e))?;
        Ok(hex::encode_upper(octets))
    } else {
        let octets = BASE64
            .decode(&text)
            .map_err(|e| format!("invalid base64 '{}': {}", text, e))?;
        Ok(BASE64.encode(octets))
    }
}

/// `YYYYMMDDHHmmSS`, or seconds since the epoch rendered in that form
fn signature_time(text: &str) -> Result<String, String> {
    let invalid = || format!("invalid signature time '{}'", text);

    if text.len() == 14 && text.bytes().all(|b| b.is_ascii_digit()) {
        let time =
            NaiveDateTime::parse_from_str(text, SIGNATURE_TIME_FORMAT).map_err(|_| invalid())?;
        return Ok(time.format(SIGNATURE_TIME_FORMAT).to_string());
    }

    let seconds: u32 = text.parse().map_err(|_| invalid())?;
    let time = DateTime::from_timestamp(i64::from(seconds), 0).ok_or_else(invalid)?;
    Ok(time.format(SIGNATURE_TIME_FORMAT).to_string())
}

/// SVCB/HTTPS `key[=value]` parameters
///
/// A quoted value arrives as its own token after `key=`; it is kept quoted.
fn parse_svc_params(tokens: &[Token]) -> Result<Vec<String>, String> {
    let mut params = Vec::with_capacity(tokens.len());
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        if token.quoted {
            return Err(format!("unexpected quoted value \"{}\"", token.text));
        }

        let (key, value) = match token.text.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (token.text.as_str(), None),
        };
        if key.is_empty() || !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(format!("invalid service parameter '{}'", token.text));
        }
        let key = key.to_ascii_lowercase();

        let param = match value {
            Some("") => match iter.next_if(|next| next.quoted) {
                Some(quoted) => format!("{}=\"{}\"", key, quoted.text),
                None => return Err(format!("service parameter '{}' has no value", key)),
            },
            Some(value) => format!("{}={}", key, value),
            None => key,
        };
        params.push(param);
    }

    Ok(params)
}
