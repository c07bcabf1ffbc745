//! The typed message model.
//!
//! One closed union covers every record the log can hold. Connection-level
//! and administrative events each get their own payload; operation-scoped
//! lines are modeled per phase, with the per-operation detail enums from
//! [`crate::operations`] nested inside, mirroring the two-level wire
//! discriminator. Every payload keeps its [`RawLine`], so the `Display`
//! form of a message is the input line, byte for byte, not a regeneration
//! from fields.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::fields::{
    AssuranceFields, CommonFields, EntryFields, ForwardTarget, IntermediateResponseFields,
    RebalancingFields, ReferenceFields, RequestFields, ResultFields,
};
use crate::operations::{OperationRequestDetails, OperationResultDetails};
use crate::result_code::ResultCode;
use crate::tokenizer::{NamedValueMap, RawLine};
use crate::types::{AccessLogMessageType, AccessLogOperationType};

/// A new connection was accepted.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub source_address: Option<String>,
    pub target_address: Option<String>,
    pub protocol_name: Option<String>,
    pub client_connection_policy: Option<String>,
}

impl ConnectMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            source_address: raw.get_string("from"),
            target_address: raw.get_string("to"),
            protocol_name: raw.get_string("protocol"),
            client_connection_policy: raw.get_string("clientConnectionPolicy"),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// A connection was closed.
#[derive(Debug, Clone, Serialize)]
pub struct DisconnectMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub disconnect_reason: Option<String>,
    pub message: Option<String>,
}

impl DisconnectMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            disconnect_reason: raw.get_string("reason"),
            message: raw.get_string("msg"),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// The client presented a certificate during security negotiation.
#[derive(Debug, Clone, Serialize)]
pub struct ClientCertificateMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub peer_subject: Option<String>,
    pub issuer_subject: Option<String>,
}

impl ClientCertificateMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            peer_subject: raw.get_string("peerSubject"),
            issuer_subject: raw.get_string("issuerSubject"),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// A security layer was negotiated on the connection.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityNegotiationMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub protocol: Option<String>,
    pub cipher: Option<String>,
}

impl SecurityNegotiationMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            protocol: raw.get_string("protocol"),
            cipher: raw.get_string("cipher"),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An administrative entry-rebalancing pass started.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRebalancingRequestMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub rebalancing: RebalancingFields,
}

impl EntryRebalancingRequestMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            rebalancing: RebalancingFields::from_raw(&raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An entry-rebalancing pass finished.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRebalancingResultMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub rebalancing: RebalancingFields,
    pub result_code: Option<ResultCode>,
    pub error_message: Option<String>,
    pub admin_action_required: Option<String>,
    pub source_altered: Option<bool>,
    pub target_altered: Option<bool>,
    pub entries_read_from_source: Option<i64>,
    pub entries_added_to_target: Option<i64>,
    pub entries_deleted_from_source: Option<i64>,
}

impl EntryRebalancingResultMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            rebalancing: RebalancingFields::from_raw(&raw),
            result_code: raw.get_int("resultCode").map(ResultCode::from_code),
            error_message: raw.get_string("errorMessage"),
            admin_action_required: raw.get_string("adminActionRequired"),
            source_altered: raw.get_boolean("sourceAltered"),
            target_altered: raw.get_boolean("targetAltered"),
            entries_read_from_source: raw.get_long("entriesReadFromSource"),
            entries_added_to_target: raw.get_long("entriesAddedToTarget"),
            entries_deleted_from_source: raw.get_long("entriesDeletedFromSource"),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An operation request was received.
#[derive(Debug, Clone, Serialize)]
pub struct OperationRequestMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub request: RequestFields,
    pub details: OperationRequestDetails,
}

impl OperationRequestMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            request: RequestFields::from_raw(&raw),
            details: OperationRequestDetails::from_raw(op, &raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An operation was forwarded to a backend server.
#[derive(Debug, Clone, Serialize)]
pub struct OperationForwardMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub request: RequestFields,
    pub target: ForwardTarget,
    pub details: OperationRequestDetails,
}

impl OperationForwardMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            request: RequestFields::from_raw(&raw),
            target: ForwardTarget::from_raw(&raw),
            details: OperationRequestDetails::from_raw(op, &raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// Forwarding an operation to a backend server failed.
///
/// The result code on these lines is deliberately the raw integer as
/// reported by the backend, never canonicalized.
#[derive(Debug, Clone, Serialize)]
pub struct OperationForwardFailedMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub request: RequestFields,
    pub target: ForwardTarget,
    pub result_code: Option<i32>,
    pub diagnostic_message: Option<String>,
    pub details: OperationRequestDetails,
}

impl OperationForwardFailedMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            request: RequestFields::from_raw(&raw),
            target: ForwardTarget::from_raw(&raw),
            result_code: raw.get_int("resultCode"),
            diagnostic_message: raw.get_string("message"),
            details: OperationRequestDetails::from_raw(op, &raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An operation completed and its result was returned.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResultMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub request: RequestFields,
    pub result: ResultFields,
    pub details: OperationResultDetails,
}

impl OperationResultMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            request: RequestFields::from_raw(&raw),
            result: ResultFields::from_raw(&raw),
            details: OperationResultDetails::from_raw(op, &raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// Assured replication completed for a write whose response had already
/// been sent, or was delayed until assurance was reached.
#[derive(Debug, Clone, Serialize)]
pub struct AssuranceCompleteMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub request: RequestFields,
    pub result: ResultFields,
    pub assurance: AssuranceFields,
    pub details: OperationResultDetails,
}

impl AssuranceCompleteMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            request: RequestFields::from_raw(&raw),
            result: ResultFields::from_raw(&raw),
            assurance: AssuranceFields::from_raw(&raw),
            details: OperationResultDetails::from_raw(op, &raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// A search returned one entry to the client.
#[derive(Debug, Clone, Serialize)]
pub struct SearchEntryMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub entry: EntryFields,
}

impl SearchEntryMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            entry: EntryFields::from_raw(&raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// A search returned one referral reference to the client.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReferenceMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub reference: ReferenceFields,
}

impl SearchReferenceMessage {
    pub(crate) fn from_raw(raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            reference: ReferenceFields::from_raw(&raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// An intermediate response was returned before the operation's final
/// result.
#[derive(Debug, Clone, Serialize)]
pub struct IntermediateResponseMessage {
    #[serde(skip_serializing)]
    raw: RawLine,
    pub common: CommonFields,
    pub connection_id: Option<i64>,
    pub operation: AccessLogOperationType,
    pub fields: IntermediateResponseFields,
}

impl IntermediateResponseMessage {
    pub(crate) fn from_raw(op: AccessLogOperationType, raw: RawLine) -> Self {
        Self {
            common: CommonFields::from_raw(&raw),
            connection_id: raw.get_long("conn"),
            operation: op,
            fields: IntermediateResponseFields::from_raw(&raw),
            raw,
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        &self.raw
    }
}

/// Any parsed access-log message.
#[derive(Debug, Clone, Serialize)]
pub enum AccessLogMessage {
    Connect(ConnectMessage),
    Disconnect(DisconnectMessage),
    ClientCertificate(ClientCertificateMessage),
    SecurityNegotiation(SecurityNegotiationMessage),
    EntryRebalancingRequest(EntryRebalancingRequestMessage),
    EntryRebalancingResult(EntryRebalancingResultMessage),
    Request(OperationRequestMessage),
    Forward(OperationForwardMessage),
    ForwardFailed(OperationForwardFailedMessage),
    Result(OperationResultMessage),
    AssuranceComplete(AssuranceCompleteMessage),
    SearchEntry(SearchEntryMessage),
    SearchReference(SearchReferenceMessage),
    IntermediateResponse(IntermediateResponseMessage),
}

impl AccessLogMessage {
    pub fn message_type(&self) -> AccessLogMessageType {
        match self {
            Self::Connect(_) => AccessLogMessageType::Connect,
            Self::Disconnect(_) => AccessLogMessageType::Disconnect,
            Self::ClientCertificate(_) => AccessLogMessageType::ClientCertificate,
            Self::SecurityNegotiation(_) => AccessLogMessageType::SecurityNegotiation,
            Self::EntryRebalancingRequest(_) => AccessLogMessageType::EntryRebalancingRequest,
            Self::EntryRebalancingResult(_) => AccessLogMessageType::EntryRebalancingResult,
            Self::Request(_) => AccessLogMessageType::Request,
            Self::Forward(_) => AccessLogMessageType::Forward,
            Self::ForwardFailed(_) => AccessLogMessageType::ForwardFailed,
            Self::Result(_) => AccessLogMessageType::Result,
            Self::AssuranceComplete(_) => AccessLogMessageType::AssuranceComplete,
            Self::SearchEntry(_) => AccessLogMessageType::Entry,
            Self::SearchReference(_) => AccessLogMessageType::Reference,
            Self::IntermediateResponse(_) => AccessLogMessageType::IntermediateResponse,
        }
    }

    /// The operation this line belongs to; `None` for connection-level and
    /// administrative messages.
    pub fn operation_type(&self) -> Option<AccessLogOperationType> {
        match self {
            Self::Connect(_)
            | Self::Disconnect(_)
            | Self::ClientCertificate(_)
            | Self::SecurityNegotiation(_)
            | Self::EntryRebalancingRequest(_)
            | Self::EntryRebalancingResult(_) => None,
            Self::Request(m) => Some(m.details.operation_type()),
            Self::Forward(m) => Some(m.details.operation_type()),
            Self::ForwardFailed(m) => Some(m.details.operation_type()),
            Self::Result(m) => Some(m.details.operation_type()),
            Self::AssuranceComplete(m) => Some(m.details.operation_type()),
            Self::SearchEntry(_) | Self::SearchReference(_) => {
                Some(AccessLogOperationType::Search)
            }
            Self::IntermediateResponse(m) => Some(m.operation),
        }
    }

    pub fn raw_line(&self) -> &RawLine {
        match self {
            Self::Connect(m) => m.raw_line(),
            Self::Disconnect(m) => m.raw_line(),
            Self::ClientCertificate(m) => m.raw_line(),
            Self::SecurityNegotiation(m) => m.raw_line(),
            Self::EntryRebalancingRequest(m) => m.raw_line(),
            Self::EntryRebalancingResult(m) => m.raw_line(),
            Self::Request(m) => m.raw_line(),
            Self::Forward(m) => m.raw_line(),
            Self::ForwardFailed(m) => m.raw_line(),
            Self::Result(m) => m.raw_line(),
            Self::AssuranceComplete(m) => m.raw_line(),
            Self::SearchEntry(m) => m.raw_line(),
            Self::SearchReference(m) => m.raw_line(),
            Self::IntermediateResponse(m) => m.raw_line(),
        }
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.raw_line().timestamp()
    }

    /// The `name=value` map of the line. Never null, possibly empty.
    pub fn named_values(&self) -> &NamedValueMap {
        self.raw_line().named_values()
    }

    /// The discriminator tokens of the line. Never null, possibly empty.
    pub fn unnamed_values(&self) -> &[String] {
        self.raw_line().unnamed_values()
    }
}

impl fmt::Display for AccessLogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_line().original_text())
    }
}
