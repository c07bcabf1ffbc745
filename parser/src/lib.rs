//! Parser for the access log format written by directory server products.
//!
//! Each log line records either a connection-lifecycle event (connect,
//! disconnect, TLS negotiation, client certificate, entry rebalancing) or
//! one phase of an LDAP operation: the request, its forwarding to a
//! backend, a forwarding failure, the result, an assurance-completion
//! notice, a returned entry or reference, or an intermediate response.
//! Lines become immutable typed values whose `Display` form is the input
//! line byte for byte.
//!
//! ```
//! use accesslog_parser::{parse_message, AccessLogMessage};
//!
//! let line = r#"[01/Jan/2021:00:00:00 +0000] DISCONNECT conn=1 reason="Client Unbind""#;
//! let message = parse_message(line).unwrap();
//! assert_eq!(message.to_string(), line);
//! assert!(matches!(message, AccessLogMessage::Disconnect(_)));
//! ```
//!
//! For whole files or streams, [`AccessLogReader`] adds the blank-line and
//! `#`-comment skip policy on top of the same per-line parse.

pub mod dispatch;
pub mod error;
pub mod fields;
pub mod message;
pub mod operations;
pub mod reader;
pub mod result_code;
pub mod tokenizer;
pub mod types;
pub mod value;

pub use dispatch::parse_message;
pub use error::LogParseError;
pub use message::AccessLogMessage;
pub use reader::AccessLogReader;
pub use result_code::ResultCode;
pub use tokenizer::{NamedValueMap, RawLine};
pub use types::{AccessLogMessageType, AccessLogOperationType};
