//! Discriminator dispatch.
//!
//! The central registry of message shapes. A line with one unnamed token is
//! a connection-level or administrative event; a line with two is one phase
//! of one operation, and only the pairs the log actually emits are
//! registered. Both tokens are validated independently and unknown or
//! unregistered combinations fail the parse; nothing here degrades to a
//! best-guess message.

use tracing::debug;

use crate::error::LogParseError;
use crate::message::{
    AccessLogMessage, AssuranceCompleteMessage, ClientCertificateMessage, ConnectMessage,
    DisconnectMessage, EntryRebalancingRequestMessage, EntryRebalancingResultMessage,
    IntermediateResponseMessage, OperationForwardFailedMessage, OperationForwardMessage,
    OperationRequestMessage, OperationResultMessage, SearchEntryMessage, SearchReferenceMessage,
    SecurityNegotiationMessage,
};
use crate::tokenizer::RawLine;
use crate::types::{AccessLogMessageType, AccessLogOperationType};

/// Parse a single access-log line into its typed message.
///
/// This is the standalone entry point for callers that already have a line
/// in hand (a log-shipping pipeline, a test). It applies no comment or
/// blank-line policy; that belongs to [`crate::reader::AccessLogReader`].
pub fn parse_message(line: &str) -> Result<AccessLogMessage, LogParseError> {
    dispatch(RawLine::parse(line)?)
}

pub(crate) fn dispatch(raw: RawLine) -> Result<AccessLogMessage, LogParseError> {
    match raw.unnamed_values().len() {
        0 => Err(LogParseError::UnrecognizedMessageType(format!(
            "line carries no message type token: {:?}",
            raw.original_text()
        ))),
        1 => dispatch_connection(raw),
        _ => dispatch_operation(raw),
    }
}

fn dispatch_connection(raw: RawLine) -> Result<AccessLogMessage, LogParseError> {
    let token = &raw.unnamed_values()[0];
    let message = match AccessLogMessageType::from_log_identifier(token) {
        Some(AccessLogMessageType::Connect) => {
            AccessLogMessage::Connect(ConnectMessage::from_raw(raw))
        }
        Some(AccessLogMessageType::Disconnect) => {
            AccessLogMessage::Disconnect(DisconnectMessage::from_raw(raw))
        }
        Some(AccessLogMessageType::ClientCertificate) => {
            AccessLogMessage::ClientCertificate(ClientCertificateMessage::from_raw(raw))
        }
        Some(AccessLogMessageType::SecurityNegotiation) => {
            AccessLogMessage::SecurityNegotiation(SecurityNegotiationMessage::from_raw(raw))
        }
        Some(AccessLogMessageType::EntryRebalancingRequest) => {
            AccessLogMessage::EntryRebalancingRequest(EntryRebalancingRequestMessage::from_raw(raw))
        }
        Some(AccessLogMessageType::EntryRebalancingResult) => {
            AccessLogMessage::EntryRebalancingResult(EntryRebalancingResultMessage::from_raw(raw))
        }
        Some(other) => {
            debug!(token = %token, "operation phase token without an operation type");
            return Err(LogParseError::UnrecognizedMessageType(format!(
                "{} requires an operation type: {:?}",
                other.log_identifier(),
                raw.original_text()
            )));
        }
        None => {
            debug!(token = %token, "unknown message type token");
            return Err(LogParseError::UnrecognizedMessageType(format!(
                "unknown message type token {token:?}: {:?}",
                raw.original_text()
            )));
        }
    };
    Ok(message)
}

fn dispatch_operation(raw: RawLine) -> Result<AccessLogMessage, LogParseError> {
    let op_token = &raw.unnamed_values()[0];
    let phase_token = &raw.unnamed_values()[1];

    // Both tokens resolve or the line fails, regardless of the other token.
    let op = AccessLogOperationType::from_log_identifier(op_token);
    let phase = AccessLogMessageType::from_log_identifier(phase_token);
    let (op, phase) = match (op, phase) {
        (Some(op), Some(phase)) if !phase.is_connection_scoped() => (op, phase),
        _ => {
            debug!(op = %op_token, phase = %phase_token, "unresolvable discriminator pair");
            return Err(LogParseError::UnrecognizedMessageType(format!(
                "unknown discriminator pair {op_token:?} {phase_token:?}: {:?}",
                raw.original_text()
            )));
        }
    };

    if !is_registered(op, phase) {
        debug!(op = %op_token, phase = %phase_token, "discriminator pair not registered");
        return Err(LogParseError::UnrecognizedMessageType(format!(
            "{} has no {} phase: {:?}",
            op.log_identifier(),
            phase.log_identifier(),
            raw.original_text()
        )));
    }

    let message = match phase {
        AccessLogMessageType::Request => {
            AccessLogMessage::Request(OperationRequestMessage::from_raw(op, raw))
        }
        AccessLogMessageType::Forward => {
            AccessLogMessage::Forward(OperationForwardMessage::from_raw(op, raw))
        }
        AccessLogMessageType::ForwardFailed => {
            AccessLogMessage::ForwardFailed(OperationForwardFailedMessage::from_raw(op, raw))
        }
        AccessLogMessageType::Result => {
            AccessLogMessage::Result(OperationResultMessage::from_raw(op, raw))
        }
        AccessLogMessageType::AssuranceComplete => {
            AccessLogMessage::AssuranceComplete(AssuranceCompleteMessage::from_raw(op, raw))
        }
        AccessLogMessageType::Entry => {
            AccessLogMessage::SearchEntry(SearchEntryMessage::from_raw(raw))
        }
        AccessLogMessageType::Reference => {
            AccessLogMessage::SearchReference(SearchReferenceMessage::from_raw(raw))
        }
        AccessLogMessageType::IntermediateResponse => {
            AccessLogMessage::IntermediateResponse(IntermediateResponseMessage::from_raw(op, raw))
        }
        // Connection-scoped phases were rejected above.
        _ => unreachable!(),
    };
    Ok(message)
}

/// The (operation, phase) pairs the log emits.
fn is_registered(op: AccessLogOperationType, phase: AccessLogMessageType) -> bool {
    use AccessLogMessageType as Phase;
    use AccessLogOperationType as Op;
    match (op, phase) {
        (Op::Unbind, Phase::Request) => true,
        (Op::Unbind, _) => false,
        (_, Phase::Request | Phase::Forward | Phase::ForwardFailed | Phase::Result) => true,
        (Op::Add | Op::Delete | Op::Modify | Op::ModifyDn, Phase::AssuranceComplete) => true,
        (Op::Search, Phase::Entry | Phase::Reference) => true,
        (Op::Extended | Op::Search, Phase::IntermediateResponse) => true,
        _ => false,
    }
}
