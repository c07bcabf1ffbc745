//! Line tokenizer.
//!
//! Splits one raw access-log line into its bracketed timestamp, the unnamed
//! discriminator tokens that identify the message shape, and the ordered
//! `name=value` map everything else is read from. The original line is kept
//! verbatim so a parsed message can reproduce it byte for byte.

use chrono::{DateTime, FixedOffset};

use crate::error::LogParseError;
use crate::value;

/// Wire format of the bracketed timestamp, e.g. `01/Jan/2021:00:00:00.123 +0000`.
/// The fractional part is optional.
const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S%.f %z";

/// Read-only, insertion-ordered view of the `name=value` tokens of one line.
///
/// Lookups return the first occurrence when a name repeats; later duplicates
/// are dropped from the map (the original text still carries them).
#[derive(Debug, Clone, Default)]
pub struct NamedValueMap {
    entries: Vec<(String, String)>,
}

impl NamedValueMap {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }

    fn insert(&mut self, name: &str, value: &str) {
        if self.get(name).is_none() {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    /// Raw string value for `name`, or `None` if the line did not carry it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One tokenized access-log line.
///
/// Immutable once parsed; every message value owns exactly one `RawLine` and
/// serves its textual form from it.
#[derive(Debug, Clone)]
pub struct RawLine {
    original: String,
    timestamp: DateTime<FixedOffset>,
    tokens: Vec<String>,
    named_values: NamedValueMap,
}

impl RawLine {
    /// Tokenize a single line (no trailing newline).
    pub fn parse(line: &str) -> Result<Self, LogParseError> {
        if !line.starts_with('[') {
            return Err(LogParseError::MalformedTimestamp(format!(
                "line does not start with a bracketed timestamp: {line:?}"
            )));
        }
        let close = line.find(']').ok_or_else(|| {
            LogParseError::MalformedTimestamp(format!("unterminated timestamp bracket: {line:?}"))
        })?;
        let stamp = &line[1..close];
        let timestamp = DateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|e| LogParseError::MalformedTimestamp(format!("{stamp:?}: {e}")))?;

        let mut tokens = Vec::new();
        let mut named_values = NamedValueMap::new();

        let rest = &line[close + 1..];
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            // Scan one token. A double quote opens a value only when it
            // directly follows '='; inside a quoted value whitespace is
            // ordinary content and the next '"' closes it (no escapes).
            let start = i;
            let mut in_quotes = false;
            while i < bytes.len() {
                let b = bytes[i];
                if in_quotes {
                    if b == b'"' {
                        in_quotes = false;
                    }
                } else if b == b' ' || b == b'\t' {
                    break;
                } else if b == b'"' && i > start && bytes[i - 1] == b'=' {
                    in_quotes = true;
                }
                i += 1;
            }
            if in_quotes {
                return Err(LogParseError::MalformedToken(format!(
                    "unterminated quoted value: {:?}",
                    &rest[start..]
                )));
            }

            let token = &rest[start..i];
            match token.find('=') {
                None => {
                    if !named_values.is_empty() {
                        return Err(LogParseError::MalformedMessage(format!(
                            "unnamed token {token:?} after the first named value: {line:?}"
                        )));
                    }
                    tokens.push(token.to_string());
                }
                Some(0) => {
                    return Err(LogParseError::MalformedToken(format!(
                        "token has an empty name: {token:?}"
                    )));
                }
                Some(eq) => {
                    let name = &token[..eq];
                    let raw_value = &token[eq + 1..];
                    let value = match raw_value.strip_prefix('"') {
                        Some(quoted) => match quoted.strip_suffix('"') {
                            Some(inner) if !inner.contains('"') => inner,
                            _ => {
                                return Err(LogParseError::MalformedToken(format!(
                                    "quoted value is not fully quoted: {token:?}"
                                )));
                            }
                        },
                        None => raw_value,
                    };
                    named_values.insert(name, value);
                }
            }
        }

        if tokens.len() > 2 {
            return Err(LogParseError::MalformedMessage(format!(
                "expected at most 2 unnamed tokens, found {}: {line:?}",
                tokens.len()
            )));
        }

        Ok(Self {
            original: line.to_string(),
            timestamp,
            tokens,
            named_values,
        })
    }

    /// The input line, byte for byte.
    pub fn original_text(&self) -> &str {
        &self.original
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Discriminator tokens in line order (0 to 2 of them).
    pub fn unnamed_values(&self) -> &[String] {
        &self.tokens
    }

    pub fn named_values(&self) -> &NamedValueMap {
        &self.named_values
    }

    /// Raw string value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.named_values.get(name)
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    /// Named value coerced to `i64`; absent or unparsable yields `None`.
    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| value::to_long(v).ok())
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|v| value::to_int(v).ok())
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| value::to_double(v).ok())
    }

    pub fn get_boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| value::to_boolean(v).ok())
    }

    /// Comma-separated named value as an ordered list; absent yields an
    /// empty list.
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.get(name).map(value::to_string_list).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_connect_line() {
        let line = r#"[01/Jan/2021:00:00:00 +0000] CONNECT conn=1 from="1.2.3.4:5678" to="5.6.7.8:389" protocol="LDAP""#;
        let raw = RawLine::parse(line).unwrap();

        assert_eq!(raw.original_text(), line);
        assert_eq!(raw.unnamed_values(), ["CONNECT"]);
        assert_eq!(raw.named_values().len(), 4);
        assert_eq!(raw.get("conn"), Some("1"));
        assert_eq!(raw.get("from"), Some("1.2.3.4:5678"));
        assert_eq!(raw.get("protocol"), Some("LDAP"));
        assert_eq!(raw.get("missing"), None);
    }

    #[test]
    fn test_parse_two_discriminator_tokens() {
        let line = "[01/Jan/2021:00:00:00 +0000] SEARCH REQUEST conn=1 op=2";
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.unnamed_values(), ["SEARCH", "REQUEST"]);
        assert_eq!(raw.get_long("op"), Some(2));
    }

    #[test]
    fn test_parse_no_discriminator_tokens() {
        let line = "[01/Jan/2021:00:00:00 +0000] conn=1";
        let raw = RawLine::parse(line).unwrap();
        assert!(raw.unnamed_values().is_empty());
        assert_eq!(raw.get("conn"), Some("1"));
    }

    #[test]
    fn test_quoted_value_keeps_spaces() {
        let line = r#"[01/Jan/2021:00:00:00 +0000] DISCONNECT conn=5 reason="Client Unbind" msg="closed by peer""#;
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.get("reason"), Some("Client Unbind"));
        assert_eq!(raw.get("msg"), Some("closed by peer"));
    }

    #[test]
    fn test_quoted_value_keeps_equals_sign() {
        let line = r#"[01/Jan/2021:00:00:00 +0000] SEARCH REQUEST filter="(uid=john)" base="dc=example,dc=com""#;
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.get("filter"), Some("(uid=john)"));
        assert_eq!(raw.get("base"), Some("dc=example,dc=com"));
    }

    #[test]
    fn test_timestamp_with_milliseconds() {
        let line = "[01/Jan/2021:12:34:56.789 +0000] CONNECT conn=1";
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.timestamp().nanosecond(), 789_000_000);
        assert_eq!(raw.timestamp().second(), 56);
    }

    #[test]
    fn test_timestamp_without_milliseconds() {
        let line = "[01/Jan/2021:12:34:56 -0500] CONNECT conn=1";
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.timestamp().nanosecond(), 0);
    }

    #[test]
    fn test_missing_bracket_is_malformed_timestamp() {
        let err = RawLine::parse("01/Jan/2021:00:00:00 +0000 CONNECT").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedTimestamp(_)));
    }

    #[test]
    fn test_unterminated_bracket_is_malformed_timestamp() {
        let err = RawLine::parse("[01/Jan/2021:00:00:00 +0000 CONNECT").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedTimestamp(_)));
    }

    #[test]
    fn test_garbage_timestamp_is_malformed_timestamp() {
        let err = RawLine::parse("[yesterday at noon] CONNECT conn=1").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedTimestamp(_)));
    }

    #[test]
    fn test_three_discriminator_tokens_rejected() {
        let err = RawLine::parse("[01/Jan/2021:00:00:00 +0000] A B C conn=1").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedMessage(_)));
    }

    #[test]
    fn test_unnamed_token_after_named_value_rejected() {
        let err = RawLine::parse("[01/Jan/2021:00:00:00 +0000] SEARCH conn=1 REQUEST").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedMessage(_)));
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let err =
            RawLine::parse(r#"[01/Jan/2021:00:00:00 +0000] DISCONNECT reason="oops"#).unwrap_err();
        assert!(matches!(err, LogParseError::MalformedToken(_)));
    }

    #[test]
    fn test_trailing_garbage_after_quote_rejected() {
        let err =
            RawLine::parse(r#"[01/Jan/2021:00:00:00 +0000] DISCONNECT reason="oops"x"#).unwrap_err();
        assert!(matches!(err, LogParseError::MalformedToken(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = RawLine::parse("[01/Jan/2021:00:00:00 +0000] CONNECT =1").unwrap_err();
        assert!(matches!(err, LogParseError::MalformedToken(_)));
    }

    #[test]
    fn test_duplicate_name_keeps_first_occurrence() {
        let line = "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1 conn=2";
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.get("conn"), Some("1"));
        assert_eq!(raw.named_values().len(), 1);
        assert_eq!(raw.original_text(), line);
    }

    #[test]
    fn test_empty_values() {
        let line = r#"[01/Jan/2021:00:00:00 +0000] CONNECT a= b="""#;
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.get("a"), Some(""));
        assert_eq!(raw.get("b"), Some(""));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let line = "[01/Jan/2021:00:00:00 +0000] CONNECT b=2 a=1 c=3";
        let raw = RawLine::parse(line).unwrap();
        let names: Vec<&str> = raw.named_values().iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_coercion_helpers() {
        let line = "[01/Jan/2021:00:00:00 +0000] CONNECT n=42 f=0.5 t=true list=a,b,c bad=xyz";
        let raw = RawLine::parse(line).unwrap();
        assert_eq!(raw.get_long("n"), Some(42));
        assert_eq!(raw.get_int("n"), Some(42));
        assert_eq!(raw.get_double("f"), Some(0.5));
        assert_eq!(raw.get_boolean("t"), Some(true));
        assert_eq!(raw.get_list("list"), ["a", "b", "c"]);
        assert_eq!(raw.get_long("bad"), None);
        assert_eq!(raw.get_long("absent"), None);
        assert!(raw.get_list("absent").is_empty());
    }
}
