//! Label sets and the character rules for names and values.

use std::collections::BTreeMap;
use std::fmt::Write;

/// Label name -> value. Kept sorted so equality and rendering are deterministic.
pub type Labels = BTreeMap<String, String>;

/// Build a label set from borrowed pairs.
pub fn labels<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Labels {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, used for metric and label names.
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Non-empty, and only characters that never need escaping in the
/// exposition format or in push backends' tag values.
pub fn is_valid_label_value(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
}

/// Helper to escape label values.
pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// HELP text escapes backslash and newline only.
pub(crate) fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Render `{k1="v1",k2="v2"}`, or nothing for an empty set.
pub(crate) fn write_label_block(out: &mut String, labels: &Labels) {
    if labels.is_empty() {
        return;
    }
    out.push('{');
    for (i, (k, v)) in labels.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}=\"{}\"", k, escape_label(v));
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(is_valid_name("test_gauge"));
        assert!(is_valid_name("_x1"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("foo-bar"));
        assert!(!is_valid_name("foo:bar"));
    }

    #[test]
    fn values() {
        assert!(is_valid_label_value("users"));
        assert!(is_valid_label_value("v1.2-rc/3"));
        assert!(!is_valid_label_value(""));
        assert!(!is_valid_label_value("foo:"));
        assert!(!is_valid_label_value("a\"b"));
        assert!(!is_valid_label_value("a b"));
        assert!(!is_valid_label_value("a,b"));
    }

    #[test]
    fn label_block_is_sorted() {
        let mut out = String::new();
        write_label_block(&mut out, &labels([("service", "users"), ("foo", "bar")]));
        assert_eq!(out, r#"{foo="bar",service="users"}"#);

        let mut empty = String::new();
        write_label_block(&mut empty, &Labels::new());
        assert!(empty.is_empty());
    }
}
