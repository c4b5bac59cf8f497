//! Submission identifier formatting.
//!
//! Identifiers are GUID-shaped text (`8-4-4-4-12` lowercase hex). The random
//! bytes come from the database (`randomblob(16)`); this module only shapes
//! and checks the text.

/// Number of hex characters in a GUID without separators.
pub const GUID_HEX_LEN: usize = 32;

const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Format 32 hex characters as a hyphenated GUID.
///
/// Returns `None` if the input is not exactly 32 ASCII hex digits.
#[must_use]
pub fn format_guid(hex: &str) -> Option<String> {
    if hex.len() != GUID_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let hex = hex.to_ascii_lowercase();
    let mut out = String::with_capacity(GUID_HEX_LEN + GROUPS.len() - 1);
    let mut start = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push_str(&hex[start..start + len]);
        start += len;
    }
    Some(out)
}

/// Whether `s` looks like a submission identifier.
///
/// Used at the HTTP boundary to answer malformed lookups with not-found
/// without touching storage.
#[must_use]
pub fn is_guid(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thirty_two_hex_chars() {
        let id = format_guid("0123456789ABCDEF0123456789abcdef").unwrap();
        assert_eq!(id, "01234567-89ab-cdef-0123-456789abcdef");
        assert!(is_guid(&id));
    }

    #[test]
    fn rejects_wrong_length_or_alphabet() {
        assert!(format_guid("abc").is_none());
        assert!(format_guid("zz23456789abcdef0123456789abcdef").is_none());
    }

    #[test]
    fn is_guid_rejects_other_shapes() {
        assert!(!is_guid(""));
        assert!(!is_guid("not-a-guid"));
        assert!(!is_guid("0123456789abcdef0123456789abcdef"));
        assert!(!is_guid("01234567-89ab-cdef-0123-456789abcdeg"));
    }
}
