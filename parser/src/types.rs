//! Discriminator types.
//!
//! Every line carries up to two unnamed tokens after the timestamp. One
//! token names a connection-level or administrative event; two tokens name
//! an operation type and the phase of that operation being reported. These
//! tokens establish message identity, so an unrecognized token is a hard
//! parse failure rather than a degraded value.

use serde::Serialize;

/// The kind of record one line holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccessLogMessageType {
    Connect,
    Disconnect,
    ClientCertificate,
    SecurityNegotiation,
    EntryRebalancingRequest,
    EntryRebalancingResult,
    Request,
    Forward,
    ForwardFailed,
    Result,
    AssuranceComplete,
    Entry,
    Reference,
    IntermediateResponse,
}

impl AccessLogMessageType {
    /// Exact wire-token lookup. Unknown tokens yield `None`.
    pub fn from_log_identifier(token: &str) -> Option<Self> {
        match token {
            "CONNECT" => Some(Self::Connect),
            "DISCONNECT" => Some(Self::Disconnect),
            "CLIENT-CERTIFICATE" => Some(Self::ClientCertificate),
            "SECURITY-NEGOTIATION" => Some(Self::SecurityNegotiation),
            "ENTRY-REBALANCING-REQUEST" => Some(Self::EntryRebalancingRequest),
            "ENTRY-REBALANCING-RESULT" => Some(Self::EntryRebalancingResult),
            "REQUEST" => Some(Self::Request),
            "FORWARD" => Some(Self::Forward),
            "FORWARD-FAILED" => Some(Self::ForwardFailed),
            "RESULT" => Some(Self::Result),
            "ASSURANCE-COMPLETE" => Some(Self::AssuranceComplete),
            "ENTRY" => Some(Self::Entry),
            "REFERENCE" => Some(Self::Reference),
            "INTERMEDIATE-RESPONSE" => Some(Self::IntermediateResponse),
            _ => None,
        }
    }

    /// The token this type is written as on the wire.
    pub fn log_identifier(&self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Disconnect => "DISCONNECT",
            Self::ClientCertificate => "CLIENT-CERTIFICATE",
            Self::SecurityNegotiation => "SECURITY-NEGOTIATION",
            Self::EntryRebalancingRequest => "ENTRY-REBALANCING-REQUEST",
            Self::EntryRebalancingResult => "ENTRY-REBALANCING-RESULT",
            Self::Request => "REQUEST",
            Self::Forward => "FORWARD",
            Self::ForwardFailed => "FORWARD-FAILED",
            Self::Result => "RESULT",
            Self::AssuranceComplete => "ASSURANCE-COMPLETE",
            Self::Entry => "ENTRY",
            Self::Reference => "REFERENCE",
            Self::IntermediateResponse => "INTERMEDIATE-RESPONSE",
        }
    }

    /// True for the single-token connection and administrative events.
    pub fn is_connection_scoped(&self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Disconnect
                | Self::ClientCertificate
                | Self::SecurityNegotiation
                | Self::EntryRebalancingRequest
                | Self::EntryRebalancingResult
        )
    }
}

/// The LDAP operation an operation-scoped line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccessLogOperationType {
    Abandon,
    Add,
    Bind,
    Compare,
    Delete,
    Extended,
    Modify,
    ModifyDn,
    Search,
    Unbind,
}

impl AccessLogOperationType {
    pub fn from_log_identifier(token: &str) -> Option<Self> {
        match token {
            "ABANDON" => Some(Self::Abandon),
            "ADD" => Some(Self::Add),
            "BIND" => Some(Self::Bind),
            "COMPARE" => Some(Self::Compare),
            "DELETE" => Some(Self::Delete),
            "EXTENDED" => Some(Self::Extended),
            "MODIFY" => Some(Self::Modify),
            "MODDN" => Some(Self::ModifyDn),
            "SEARCH" => Some(Self::Search),
            "UNBIND" => Some(Self::Unbind),
            _ => None,
        }
    }

    pub fn log_identifier(&self) -> &'static str {
        match self {
            Self::Abandon => "ABANDON",
            Self::Add => "ADD",
            Self::Bind => "BIND",
            Self::Compare => "COMPARE",
            Self::Delete => "DELETE",
            Self::Extended => "EXTENDED",
            Self::Modify => "MODIFY",
            Self::ModifyDn => "MODDN",
            Self::Search => "SEARCH",
            Self::Unbind => "UNBIND",
        }
    }
}
