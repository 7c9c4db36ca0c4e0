use super::name::{absolute_name, fqdn};
use super::rdata::{CharString, RData};
use super::record::ParsedRecord;
use super::types::{RecordClass, RecordType};
use super::{Result, ZoneError, constants, layout};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tracing::{debug, trace};

/// RFC 1035 zone file parser
///
/// The parser itself only holds options; every call to [`ZoneParser::parse`]
/// starts from a fresh origin/TTL state, so one parser can serve any number
/// of independent reads.
#[derive(Debug, Clone)]
pub struct ZoneParser {
    /// Largest accepted zone content in bytes
    max_zone_size: usize,
}

/// A lexical token; quoted tokens keep their escapes undecoded.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub(super) text: String,
    pub(super) quoted: bool,
}

impl Token {
    pub(super) fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }
}

/// One logical zone file entry, possibly spanning lines through parentheses.
#[derive(Debug)]
struct Entry {
    /// Line the entry starts on
    line: usize,
    /// The entry's line started with whitespace, so the owner is inherited
    blank_owner: bool,
    tokens: Vec<Token>,
}

/// Directive state carried from one entry to the next
struct ParseState {
    /// Current origin, fully qualified
    origin: Option<String>,
    /// TTL set by $TTL
    directive_ttl: Option<u32>,
    /// Last TTL given explicitly on a record
    last_ttl: Option<u32>,
    /// Owner of the previous record
    last_owner: Option<String>,
}

impl ZoneParser {
    /// Create a new zone parser
    pub fn new() -> Self {
        Self {
            max_zone_size: constants::MAX_ZONE_FILE_SIZE,
        }
    }

    /// Set the largest zone content, in bytes, the parser will accept
    pub fn with_max_zone_size(mut self, limit: usize) -> Self {
        self.max_zone_size = limit;
        self
    }

    /// Parse zone file contents into records, in file order
    ///
    /// `origin` plays the role of an `$ORIGIN` directive at the top of the
    /// file. It may be given with or without the trailing dot; an empty
    /// string means no origin.
    pub fn parse(&self, contents: &str, origin: Option<&str>) -> Result<Vec<ParsedRecord>> {
        if contents.len() > self.max_zone_size {
            return Err(ZoneError::TooLarge {
                size: contents.len(),
                limit: self.max_zone_size,
            });
        }

        let mut state = ParseState {
            origin: origin.filter(|o| !o.is_empty()).map(fqdn),
            directive_ttl: None,
            last_ttl: None,
            last_owner: None,
        };
        let mut records = Vec::new();

        for entry in tokenize(contents)? {
            trace!("Parsing entry at line {}: {:?}", entry.line, entry.tokens);

            let first = &entry.tokens[0];
            if !entry.blank_owner && !first.quoted && first.text.starts_with('$') {
                state.parse_directive(&entry, &mut records)?;
            } else {
                let record = state.parse_record(entry.line, entry.blank_owner, &entry.tokens)?;
                records.push(record);
            }
        }

        debug!("Parsed {} records", records.len());
        Ok(records)
    }
}

impl Default for ZoneParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split zone text into entries, handling comments, quotes and parentheses.
fn tokenize(contents: &str) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut tokens: Vec<Token> = Vec::new();
    let mut current = String::new();

    let mut line = 1;
    let mut entry_line = 1;
    let mut blank_owner = false;
    let mut at_line_start = true;
    let mut paren_depth = 0usize;
    let mut paren_line = 0;

    fn flush(current: &mut String, tokens: &mut Vec<Token>) {
        if !current.is_empty() {
            tokens.push(Token::bare(std::mem::take(current)));
        }
    }

    let mut chars = contents.chars().peekable();
    while let Some(ch) = chars.next() {
        if at_line_start {
            at_line_start = false;
            if paren_depth == 0 && tokens.is_empty() {
                blank_owner = ch == ' ' || ch == '\t';
                entry_line = line;
            }
        }

        match ch {
            '\n' => {
                flush(&mut current, &mut tokens);
                if paren_depth == 0 && !tokens.is_empty() {
                    entries.push(Entry {
                        line: entry_line,
                        blank_owner,
                        tokens: std::mem::take(&mut tokens),
                    });
                }
                line += 1;
                at_line_start = true;
            }
            ' ' | '\t' | '\r' => flush(&mut current, &mut tokens),
            ';' => {
                flush(&mut current, &mut tokens);
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            '(' => {
                flush(&mut current, &mut tokens);
                if paren_depth == 0 {
                    paren_line = line;
                }
                paren_depth += 1;
            }
            ')' => {
                flush(&mut current, &mut tokens);
                if paren_depth == 0 {
                    return Err(ZoneError::syntax(line, "unbalanced closing parenthesis"));
                }
                paren_depth -= 1;
            }
            '"' => {
                flush(&mut current, &mut tokens);
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => {
                            text.push('\\');
                            match chars.next() {
                                Some(escaped) => text.push(escaped),
                                None => {
                                    return Err(ZoneError::syntax(
                                        line,
                                        "unterminated quoted string",
                                    ));
                                }
                            }
                        }
                        Some('\n') => {
                            return Err(ZoneError::syntax(line, "newline in quoted string"));
                        }
                        Some(c) => text.push(c),
                        None => {
                            return Err(ZoneError::syntax(line, "unterminated quoted string"));
                        }
                    }
                }
                tokens.push(Token { text, quoted: true });
            }
            '\\' => {
                current.push('\\');
                if let Some(escaped) = chars.next() {
                    if escaped == '\n' {
                        line += 1;
                    }
                    current.push(escaped);
                }
            }
            c => current.push(c),
        }
    }

    flush(&mut current, &mut tokens);
    if paren_depth > 0 {
        return Err(ZoneError::syntax(
            paren_line,
            format!("unclosed parentheses starting at line {}", paren_line),
        ));
    }
    if !tokens.is_empty() {
        entries.push(Entry {
            line: entry_line,
            blank_owner,
            tokens,
        });
    }

    Ok(entries)
}

impl ParseState {
    /// Parse a directive entry
    fn parse_directive(&mut self, entry: &Entry, records: &mut Vec<ParsedRecord>) -> Result<()> {
        let line = entry.line;
        let directive = &entry.tokens[0].text;
        let args = &entry.tokens[1..];

        match directive.to_ascii_uppercase().as_str() {
            "$ORIGIN" => {
                let [name] = args else {
                    return Err(ZoneError::syntax(line, "$ORIGIN requires one domain name"));
                };
                let origin = absolute_name(&name.text, self.origin.as_deref())
                    .map_err(|e| ZoneError::syntax(line, e))?;
                debug!("Set origin to: {}", origin);
                self.origin = Some(origin);
            }
            "$TTL" => {
                let [value] = args else {
                    return Err(ZoneError::syntax(line, "$TTL requires one value"));
                };
                let ttl = parse_ttl(&value.text).map_err(|e| ZoneError::syntax(line, e))?;
                debug!("Set default TTL to: {}", ttl);
                self.directive_ttl = Some(ttl);
            }
            "$INCLUDE" => {
                return Err(ZoneError::syntax(line, "$INCLUDE directive not allowed"));
            }
            "$GENERATE" => self.generate(line, args, records)?,
            _ => {
                return Err(ZoneError::syntax(
                    line,
                    format!("unknown directive '{}'", directive),
                ));
            }
        }

        Ok(())
    }

    /// Expand a `$GENERATE range lhs [ttl] [class] type rhs` directive
    fn generate(
        &mut self,
        line: usize,
        args: &[Token],
        records: &mut Vec<ParsedRecord>,
    ) -> Result<()> {
        if args.len() < 4 {
            return Err(ZoneError::syntax(
                line,
                "$GENERATE requires range, lhs, type, and rhs",
            ));
        }

        let (start, stop, step) =
            parse_generate_range(&args[0].text).map_err(|e| ZoneError::syntax(line, e))?;
        let count = u64::from((stop - start) / step) + 1;
        if count > constants::MAX_GENERATED_RECORDS {
            return Err(ZoneError::syntax(
                line,
                format!(
                    "$GENERATE would produce {} records, more than the {} allowed",
                    count,
                    constants::MAX_GENERATED_RECORDS
                ),
            ));
        }

        debug!("Processing $GENERATE {}-{}/{}", start, stop, step);

        for i in (start..=stop).step_by(step as usize) {
            let tokens = args[1..]
                .iter()
                .map(|token| {
                    expand_generate_format(&token.text, i).map(|text| Token {
                        text,
                        quoted: token.quoted,
                    })
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| ZoneError::syntax(line, e))?;
            records.push(self.parse_record(line, false, &tokens)?);
        }

        debug!("Generated {} records from $GENERATE", count);
        Ok(())
    }

    /// Parse a resource record entry
    fn parse_record(
        &mut self,
        line: usize,
        blank_owner: bool,
        tokens: &[Token],
    ) -> Result<ParsedRecord> {
        let err = |reason: String| ZoneError::syntax(line, reason);

        let mut idx = 0;
        let owner = if blank_owner {
            self.last_owner
                .clone()
                .ok_or_else(|| err("no previous owner name to inherit".to_string()))?
        } else {
            idx += 1;
            absolute_name(&tokens[0].text, self.origin.as_deref()).map_err(err)?
        };

        // TTL and class are optional and may come in either order
        let mut ttl = None;
        let mut class = None;
        let mut rtype = None;
        while let Some(token) = tokens.get(idx) {
            idx += 1;
            if token.quoted {
                return Err(err(format!("unexpected quoted string \"{}\"", token.text)));
            }
            if ttl.is_none() && token.text.starts_with(|c: char| c.is_ascii_digit()) {
                ttl = Some(parse_ttl(&token.text).map_err(err)?);
                continue;
            }
            if class.is_none() {
                if let Ok(parsed) = token.text.parse::<RecordClass>() {
                    class = Some(parsed);
                    continue;
                }
            }
            rtype = Some(token.text.parse::<RecordType>().map_err(err)?);
            break;
        }
        let rtype = rtype.ok_or_else(|| err("missing record type".to_string()))?;

        let ttl = match ttl {
            Some(ttl) => {
                self.last_ttl = Some(ttl);
                ttl
            }
            None => self
                .directive_ttl
                .or(self.last_ttl)
                .unwrap_or(constants::DEFAULT_TTL),
        };

        let rdata = self.parse_rdata(rtype, &tokens[idx..]).map_err(err)?;
        self.last_owner = Some(owner.clone());

        Ok(ParsedRecord::new(
            owner,
            class.unwrap_or_default(),
            ttl,
            rdata,
        ))
    }

    /// Parse the RDATA columns of a record of type `rtype`
    fn parse_rdata(&self, rtype: RecordType, tokens: &[Token]) -> std::result::Result<RData, String> {
        if tokens.is_empty() {
            return Err("missing RDATA".to_string());
        }

        if !tokens[0].quoted && tokens[0].text == "\\#" {
            if RData::has_dedicated_variant(rtype) || layout::of(rtype).is_some() {
                return Err(format!(
                    "generic RDATA encoding is not supported for {} records",
                    rtype
                ));
            }
            return parse_generic_rdata(rtype, &tokens[1..]);
        }

        let origin = self.origin.as_deref();
        let name = |token: &Token| absolute_name(&token.text, origin);

        match rtype {
            RecordType::A => {
                let [addr] = fields::<1>(rtype, tokens)?;
                addr.text
                    .parse::<Ipv4Addr>()
                    .map(RData::A)
                    .map_err(|_| format!("invalid IPv4 address '{}'", addr.text))
            }
            RecordType::AAAA => {
                let [addr] = fields::<1>(rtype, tokens)?;
                addr.text
                    .parse::<Ipv6Addr>()
                    .map(RData::Aaaa)
                    .map_err(|_| format!("invalid IPv6 address '{}'", addr.text))
            }
            RecordType::NS => Ok(RData::Ns(name(single(rtype, tokens)?)?)),
            RecordType::CNAME => Ok(RData::Cname(name(single(rtype, tokens)?)?)),
            RecordType::PTR => Ok(RData::Ptr(name(single(rtype, tokens)?)?)),
            RecordType::DNAME => Ok(RData::Dname(name(single(rtype, tokens)?)?)),
            RecordType::MX => {
                let [preference, exchange] = fields::<2>(rtype, tokens)?;
                Ok(RData::Mx {
                    preference: number(preference, "MX preference")?,
                    exchange: name(exchange)?,
                })
            }
            RecordType::SRV => {
                let [priority, weight, port, target] = fields::<4>(rtype, tokens)?;
                Ok(RData::Srv {
                    priority: number(priority, "SRV priority")?,
                    weight: number(weight, "SRV weight")?,
                    port: number(port, "SRV port")?,
                    target: name(target)?,
                })
            }
            RecordType::TXT => Ok(RData::Txt(char_strings(tokens)?)),
            RecordType::SPF => Ok(RData::Spf(char_strings(tokens)?)),
            RecordType::SOA => {
                let [mname, rname, serial, refresh, retry, expire, minimum] =
                    fields::<7>(rtype, tokens)?;
                Ok(RData::Soa {
                    mname: name(mname)?,
                    rname: name(rname)?,
                    serial: number(serial, "SOA serial")?,
                    refresh: parse_ttl(&refresh.text)?,
                    retry: parse_ttl(&retry.text)?,
                    expire: parse_ttl(&expire.text)?,
                    minimum: parse_ttl(&minimum.text)?,
                })
            }
            RecordType::CAA => {
                let [flags, tag, value] = fields::<3>(rtype, tokens)?;
                if tag.text.is_empty() || !tag.text.bytes().all(|b| b.is_ascii_alphanumeric()) {
                    return Err(format!("invalid CAA tag '{}'", tag.text));
                }
                Ok(RData::Caa {
                    flags: number(flags, "CAA flags")?,
                    tag: tag.text.clone(),
                    value: unescape(&value.text)?,
                })
            }
            _ => match layout::of(rtype) {
                Some(slots) => layout::parse(rtype, slots, tokens, origin)
                    .map(|fields| RData::Fields { rtype, fields }),
                None => Err(format!(
                    "{} records must use the \\# generic RDATA encoding",
                    rtype
                )),
            },
        }
    }
}

/// Require exactly `N` RDATA fields
fn fields<const N: usize>(
    rtype: RecordType,
    tokens: &[Token],
) -> std::result::Result<&[Token; N], String> {
    tokens
        .try_into()
        .map_err(|_| format!("{} record requires {} fields, got {}", rtype, N, tokens.len()))
}

fn single(rtype: RecordType, tokens: &[Token]) -> std::result::Result<&Token, String> {
    let [token] = fields::<1>(rtype, tokens)?;
    Ok(token)
}

fn number<T: FromStr>(token: &Token, what: &str) -> std::result::Result<T, String> {
    token
        .text
        .parse()
        .map_err(|_| format!("invalid {} '{}'", what, token.text))
}

/// Each token is one character-string; overlong strings are split.
fn char_strings(tokens: &[Token]) -> std::result::Result<Vec<CharString>, String> {
    let mut strings = Vec::with_capacity(tokens.len());
    for token in tokens {
        strings.extend(CharString::split(&unescape(&token.text)?));
    }
    Ok(strings)
}

/// RFC 3597 `\# length hex...` data
fn parse_generic_rdata(rtype: RecordType, tokens: &[Token]) -> std::result::Result<RData, String> {
    let (length, hex_tokens) = tokens
        .split_first()
        .ok_or_else(|| "generic RDATA requires a length".to_string())?;
    let length: usize = number(length, "generic RDATA length")?;

    let hex_text: String = hex_tokens.iter().map(|t| t.text.as_str()).collect();
    let data = hex::decode(&hex_text)
        .map_err(|e| format!("invalid generic RDATA hex '{}': {}", hex_text, e))?;
    if data.len() != length {
        return Err(format!(
            "generic RDATA length {} does not match {} octets of data",
            length,
            data.len()
        ));
    }

    Ok(RData::Unknown { rtype, data })
}

/// Decode `\X` and `\DDD` escapes into octets
pub(super) fn unescape(text: &str) -> std::result::Result<Vec<u8>, String> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let rest = &bytes[i + 1..];
        if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
            let value = rest[..3]
                .iter()
                .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
            let octet = u8::try_from(value)
                .map_err(|_| format!("escape \\{} out of range in '{}'", value, text))?;
            out.push(octet);
            i += 4;
        } else if let Some(&escaped) = rest.first() {
            out.push(escaped);
            i += 2;
        } else {
            return Err(format!("dangling backslash in '{}'", text));
        }
    }
    Ok(out)
}

/// Parse TTL value (plain seconds or unit suffixes like 1h30m)
fn parse_ttl(s: &str) -> std::result::Result<u32, String> {
    let invalid = || format!("invalid TTL '{}'", s);

    if s.is_empty() {
        return Err(invalid());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse().map_err(|_| invalid());
    }

    let mut total: u32 = 0;
    let mut value: Option<u32> = None;
    for ch in s.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let next = value
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(invalid)?;
            value = Some(next);
            continue;
        }

        let unit: u32 = match ch.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            'w' => 604800,
            _ => return Err(invalid()),
        };
        let n = value.take().ok_or_else(invalid)?;
        total = n
            .checked_mul(unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
    }

    // A trailing bare number counts as seconds
    if let Some(n) = value {
        total = total.checked_add(n).ok_or_else(invalid)?;
    }
    Ok(total)
}

/// Parse $GENERATE range specification
fn parse_generate_range(range_str: &str) -> std::result::Result<(u32, u32, u32), String> {
    // Format: start-stop[/step]
    let (range, step) = match range_str.split_once('/') {
        Some((range, step)) => (range, Some(step)),
        None => (range_str, None),
    };

    let (start_str, stop_str) = range
        .split_once('-')
        .ok_or_else(|| "$GENERATE range must contain '-'".to_string())?;

    let start = start_str
        .parse::<u32>()
        .map_err(|_| format!("Invalid $GENERATE start: {}", start_str))?;
    let stop = stop_str
        .parse::<u32>()
        .map_err(|_| format!("Invalid $GENERATE stop: {}", stop_str))?;
    let step = match step {
        Some(step) => step
            .parse::<u32>()
            .map_err(|_| format!("Invalid $GENERATE step: {}", step))?,
        None => 1,
    };

    if start > stop {
        return Err("$GENERATE start must be <= stop".to_string());
    }
    if step == 0 {
        return Err("$GENERATE step must be > 0".to_string());
    }

    Ok((start, stop, step))
}

/// Widest `${offset,width}` field; nothing longer fits a name or RDATA field
const MAX_GENERATE_WIDTH: usize = 255;

/// Expand `$`, `\$` and `${offset[,width[,base]]}` in a $GENERATE template
fn expand_generate_format(template: &str, value: u32) -> std::result::Result<String, String> {
    let mut result = String::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'$') => {
                chars.next();
                result.push('$');
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();

                let mut spec = String::new();
                let mut found_close = false;
                for ch in chars.by_ref() {
                    if ch == '}' {
                        found_close = true;
                        break;
                    }
                    spec.push(ch);
                }
                if !found_close {
                    return Err("Unclosed ${} in $GENERATE".to_string());
                }

                let parts: Vec<&str> = spec.split(',').collect();
                if parts.len() > 3 {
                    return Err(
                        "Invalid $GENERATE format, expected ${offset,width,base}".to_string()
                    );
                }

                let offset = parts[0]
                    .parse::<i64>()
                    .map_err(|_| format!("Invalid offset: {}", parts[0]))?;
                let width = match parts.get(1) {
                    Some(width) => width
                        .parse::<usize>()
                        .ok()
                        .filter(|&w| w <= MAX_GENERATE_WIDTH)
                        .ok_or_else(|| format!("Invalid width: {}", width))?,
                    None => 0,
                };
                let base = parts.get(2).copied().unwrap_or("d");

                let adjusted = i64::from(value) + offset;
                if adjusted < 0 {
                    return Err(format!("$GENERATE offset {} makes {} negative", offset, value));
                }

                let formatted = match base {
                    "d" => format!("{:0width$}", adjusted, width = width),
                    "o" => format!("{:0width$o}", adjusted, width = width),
                    "x" => format!("{:0width$x}", adjusted, width = width),
                    "X" => format!("{:0width$X}", adjusted, width = width),
                    _ => {
                        return Err(format!(
                            "Invalid base '{}', expected d, o, x, or X",
                            base
                        ));
                    }
                };
                result.push_str(&formatted);
            }
            '$' => result.push_str(&value.to_string()),
            c => result.push(c),
        }
    }

    Ok(result)
}
