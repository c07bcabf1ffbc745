//! Streaming access-log reader.
//!
//! Pulls lines one at a time from any buffered source, applies the
//! comment and blank-line skip policy, and yields one typed message per
//! call. A line that fails to parse is consumed along with the error, so
//! the caller decides whether to skip it and keep reading or abandon the
//! stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::dispatch::parse_message;
use crate::error::LogParseError;
use crate::message::AccessLogMessage;

/// Reads access-log messages from a line-oriented source.
///
/// The reader owns its source exclusively and is strictly synchronous;
/// parsed messages carry no reference back to it and may outlive it.
#[derive(Debug)]
pub struct AccessLogReader<R> {
    source: Option<R>,
    line_buffer: String,
}

impl AccessLogReader<BufReader<File>> {
    /// Open a log file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LogParseError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> AccessLogReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source: Some(source),
            line_buffer: String::new(),
        }
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` at end of stream. Blank lines and `#` comments
    /// are skipped. A line that fails to parse returns its error exactly
    /// once; the line is consumed, so the next call moves on to the next
    /// physical line.
    pub fn read(&mut self) -> Result<Option<AccessLogMessage>, LogParseError> {
        let source = self.source.as_mut().ok_or(LogParseError::Closed)?;
        loop {
            self.line_buffer.clear();
            let bytes_read = source.read_line(&mut self.line_buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            let line = self.line_buffer.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                debug!("skipping blank or comment line");
                continue;
            }
            return match parse_message(line) {
                Ok(message) => Ok(Some(message)),
                Err(e) => {
                    warn!(error = %e, "unparsable access log line");
                    Err(e)
                }
            };
        }
    }

    /// Release the underlying source. Safe to call more than once; a
    /// subsequent [`read`](Self::read) reports [`LogParseError::Closed`].
    pub fn close(&mut self) {
        self.source = None;
    }
}

impl<R: BufRead> Iterator for AccessLogReader<R> {
    type Item = Result<AccessLogMessage, LogParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => None,
            Err(LogParseError::Closed) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessLogMessageType;
    use std::io::Cursor;

    #[test]
    fn test_reads_messages_in_order() {
        let data = "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1\n\
                    [01/Jan/2021:00:00:01 +0000] UNBIND REQUEST conn=1 op=0\n\
                    [01/Jan/2021:00:00:01 +0000] DISCONNECT conn=1\n";
        let mut reader = AccessLogReader::new(Cursor::new(data));

        let m = reader.read().unwrap().unwrap();
        assert_eq!(m.message_type(), AccessLogMessageType::Connect);
        let m = reader.read().unwrap().unwrap();
        assert_eq!(m.message_type(), AccessLogMessageType::Request);
        let m = reader.read().unwrap().unwrap();
        assert_eq!(m.message_type(), AccessLogMessageType::Disconnect);
        assert!(reader.read().unwrap().is_none());
        // EOF is sticky.
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_comment_and_blank_only_file_is_empty() {
        let data = "# access log v1\n\n";
        let mut reader = AccessLogReader::new(Cursor::new(data));
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_skips_comments_and_blanks_between_messages() {
        let data = "# header\n\
                    [01/Jan/2021:00:00:00 +0000] CONNECT conn=1\n\
                    \n\
                    # trailing note\n\
                    [01/Jan/2021:00:00:01 +0000] DISCONNECT conn=1\n";
        let mut reader = AccessLogReader::new(Cursor::new(data));
        assert_eq!(
            reader.read().unwrap().unwrap().message_type(),
            AccessLogMessageType::Connect
        );
        assert_eq!(
            reader.read().unwrap().unwrap().message_type(),
            AccessLogMessageType::Disconnect
        );
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_failed_line_is_consumed_not_retried() {
        let data = "[01/Jan/2021:00:00:00 +0000] NONSENSE conn=1\n\
                    [01/Jan/2021:00:00:01 +0000] CONNECT conn=2\n";
        let mut reader = AccessLogReader::new(Cursor::new(data));

        let err = reader.read().unwrap_err();
        assert!(matches!(err, LogParseError::UnrecognizedMessageType(_)));

        // The bad line was consumed; the next read yields the next line.
        let m = reader.read().unwrap().unwrap();
        assert_eq!(m.message_type(), AccessLogMessageType::Connect);
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut reader = AccessLogReader::new(Cursor::new(
            "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1\n",
        ));
        reader.close();
        reader.close();
        assert!(matches!(reader.read(), Err(LogParseError::Closed)));
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1\r\n\
                    [01/Jan/2021:00:00:01 +0000] DISCONNECT conn=1\r\n";
        let mut reader = AccessLogReader::new(Cursor::new(data));
        let m = reader.read().unwrap().unwrap();
        // The stripped line, not the CRLF-bearing one, is the message text.
        assert_eq!(m.to_string(), "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1");
        assert!(reader.read().unwrap().is_some());
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_iterator_yields_errors_inline() {
        let data = "[01/Jan/2021:00:00:00 +0000] CONNECT conn=1\n\
                    not a log line\n\
                    [01/Jan/2021:00:00:01 +0000] DISCONNECT conn=1\n";
        let reader = AccessLogReader::new(Cursor::new(data));
        let results: Vec<_> = reader.collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_whole_session() {
        let data = r#"[01/Jan/2021:08:00:00.015 +0000] CONNECT conn=12 from="10.0.0.5:49152" to="10.0.0.1:389" protocol="LDAP"
[01/Jan/2021:08:00:00.031 +0000] BIND REQUEST conn=12 op=0 msgID=1 version="3" dn="uid=u,ou=People,dc=example,dc=com" authType="SIMPLE"
[01/Jan/2021:08:00:00.048 +0000] BIND RESULT conn=12 op=0 msgID=1 resultCode=0 etime=1.204 authDN="uid=u,ou=People,dc=example,dc=com"
[01/Jan/2021:08:00:00.101 +0000] SEARCH REQUEST conn=12 op=1 msgID=2 base="dc=example,dc=com" scope=2 filter="(uid=u)" attrs="ALL"
[01/Jan/2021:08:00:00.105 +0000] SEARCH ENTRY conn=12 op=1 msgID=2 dn="uid=u,ou=People,dc=example,dc=com"
[01/Jan/2021:08:00:00.107 +0000] SEARCH RESULT conn=12 op=1 msgID=2 resultCode=0 etime=4.2 entriesReturned=1
[01/Jan/2021:08:00:05.000 +0000] UNBIND REQUEST conn=12 op=2 msgID=3
[01/Jan/2021:08:00:05.002 +0000] DISCONNECT conn=12 reason="Client Unbind"
"#;
        let reader = AccessLogReader::new(Cursor::new(data));
        let messages: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(messages.len(), 8);

        let types: Vec<_> = messages.iter().map(|m| m.message_type()).collect();
        assert_eq!(
            types,
            [
                AccessLogMessageType::Connect,
                AccessLogMessageType::Request,
                AccessLogMessageType::Result,
                AccessLogMessageType::Request,
                AccessLogMessageType::Entry,
                AccessLogMessageType::Result,
                AccessLogMessageType::Request,
                AccessLogMessageType::Disconnect,
            ]
        );
        for (message, line) in messages.iter().zip(data.lines()) {
            assert_eq!(message.to_string(), line);
        }
    }

    #[test]
    fn test_open_reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("access.log");
        std::fs::write(
            &path,
            "# header\n[01/Jan/2021:00:00:00 +0000] CONNECT conn=1\n",
        )
        .unwrap();

        let mut reader = AccessLogReader::open(&path).unwrap();
        let m = reader.read().unwrap().unwrap();
        assert_eq!(m.message_type(), AccessLogMessageType::Connect);
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let err = AccessLogReader::open("/nonexistent/access.log").unwrap_err();
        assert!(matches!(err, LogParseError::Io(_)));
    }
}
