//! Domain name helpers for presentation-format names.

/// Maximum length of a single label in octets.
const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a domain name in octets (wire form).
const MAX_NAME_LEN: usize = 255;

/// Characters of a name quoted in error messages
const EXCERPT_LEN: usize = 32;

/// Returns true if `name` ends with an unescaped dot.
pub fn is_fqdn(name: &str) -> bool {
    if !name.ends_with('.') {
        return false;
    }
    let backslashes = name[..name.len() - 1]
        .bytes()
        .rev()
        .take_while(|&b| b == b'\\')
        .count();
    backslashes % 2 == 0
}

/// Returns the fully-qualified form of `name`, appending a dot if needed.
pub fn fqdn(name: &str) -> String {
    if is_fqdn(name) {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Resolves a name as written in a zone file against `origin`.
///
/// `origin` must already be fully qualified. `@` refers to the origin
/// itself and relative names require one.
pub fn absolute_name(name: &str, origin: Option<&str>) -> Result<String, String> {
    if name == "@" {
        return origin
            .map(str::to_string)
            .ok_or_else(|| "'@' used but no origin is set".to_string());
    }

    let absolute = if is_fqdn(name) {
        name.to_string()
    } else {
        let origin = origin.ok_or_else(|| {
            format!("relative name '{}' used but no origin is set", excerpt(name))
        })?;
        if origin == "." {
            format!("{}.", name)
        } else {
            format!("{}.{}", name, origin)
        }
    };

    validate_name(&absolute)?;
    Ok(absolute)
}

/// Checks label and total length limits of a fully-qualified name.
fn validate_name(name: &str) -> Result<(), String> {
    if name == "." {
        return Ok(());
    }

    // One length octet per label plus the root label.
    let mut wire_len = 1;
    for label in split_labels(name) {
        let len = label_octets(label)
            .ok_or_else(|| format!("bad escape sequence in name '{}'", excerpt(name)))?;
        if len == 0 {
            return Err(format!("empty label in name '{}'", excerpt(name)));
        }
        if len > MAX_LABEL_LEN {
            return Err(format!(
                "label '{}' of {} octets exceeds {} octets",
                excerpt(label),
                len,
                MAX_LABEL_LEN
            ));
        }
        wire_len += len + 1;
    }

    if wire_len > MAX_NAME_LEN {
        return Err(format!(
            "name '{}' of {} octets exceeds {} octets",
            excerpt(name),
            wire_len,
            MAX_NAME_LEN
        ));
    }
    Ok(())
}

/// At most `EXCERPT_LEN` characters of `text`, marked when cut
fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_LEN) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Splits a fully-qualified name at unescaped dots, dropping the root label.
fn split_labels(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut labels = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'.' => {
                labels.push(&name[start..i]);
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    if start < name.len() {
        labels.push(&name[start..]);
    }
    labels
}

/// Number of octets a presentation-format label occupies on the wire.
fn label_octets(label: &str) -> Option<usize> {
    let bytes = label.as_bytes();
    let mut len = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let rest = &bytes[i + 1..];
            if rest.len() >= 3 && rest[..3].iter().all(u8::is_ascii_digit) {
                i += 4;
            } else if !rest.is_empty() {
                i += 2;
            } else {
                return None;
            }
        } else {
            i += 1;
        }
        len += 1;
    }
    Some(len)
}
