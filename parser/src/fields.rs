//! Shared field groups.
//!
//! The log format repeats the same clusters of named values across many
//! message shapes: the identity of the server instance, the ids of a
//! request, the target of a forward, the outcome of a result, the assured
//! replication report. Each cluster is one struct here with an eager
//! constructor over the tokenized line; message payloads compose them.
//!
//! Every field is optional on the wire. Absent means `None`, never a
//! guessed default, except the multi-valued fields that default to an
//! empty list.

use serde::Serialize;

use crate::result_code::ResultCode;
use crate::tokenizer::RawLine;

/// Server identity fields any line may carry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommonFields {
    pub product_name: Option<String>,
    pub instance_name: Option<String>,
    pub startup_id: Option<String>,
    pub thread_id: Option<i64>,
}

impl CommonFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            product_name: raw.get_string("product"),
            instance_name: raw.get_string("instanceName"),
            startup_id: raw.get_string("startupID"),
            thread_id: raw.get_long("threadID"),
        }
    }
}

/// Fields identifying one operation request.
///
/// `requester_dn` is typically absent before authentication completes, for
/// example on the BIND request itself.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestFields {
    pub operation_id: Option<i64>,
    pub message_id: Option<i32>,
    pub origin: Option<String>,
    pub requester_ip: Option<String>,
    pub requester_dn: Option<String>,
    pub intermediate_client_request: Option<String>,
    pub operation_purpose: Option<String>,
}

impl RequestFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            operation_id: raw.get_long("op"),
            message_id: raw.get_int("msgID"),
            origin: raw.get_string("origin"),
            requester_ip: raw.get_string("requesterIP"),
            requester_dn: raw.get_string("requesterDN"),
            intermediate_client_request: raw.get_string("via"),
            operation_purpose: raw.get_string("opPurpose"),
        }
    }
}

/// Backend server a request was forwarded to.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ForwardTarget {
    pub host: Option<String>,
    pub port: Option<i32>,
    pub protocol: Option<String>,
}

impl ForwardTarget {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            host: raw.get_string("targetHost"),
            port: raw.get_int("targetPort"),
            protocol: raw.get_string("targetProtocol"),
        }
    }
}

/// Outcome fields of a RESULT or ASSURANCE-COMPLETE line.
///
/// `result_code` here is canonical; the raw-integer treatment of
/// FORWARD-FAILED lines lives on that payload instead.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultFields {
    pub result_code: Option<ResultCode>,
    pub diagnostic_message: Option<String>,
    pub additional_information: Option<String>,
    pub matched_dn: Option<String>,
    pub processing_time_millis: Option<f64>,
    pub queue_time_millis: Option<i64>,
    pub intermediate_client_result: Option<String>,
    pub referral_urls: Vec<String>,
    pub alternate_authorization_dn: Option<String>,
}

impl ResultFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            result_code: raw.get_int("resultCode").map(ResultCode::from_code),
            diagnostic_message: raw.get_string("message"),
            additional_information: raw.get_string("additionalInfo"),
            matched_dn: raw.get_string("matchedDN"),
            processing_time_millis: raw.get_double("etime"),
            queue_time_millis: raw.get_long("qtime"),
            intermediate_client_result: raw.get_string("from"),
            referral_urls: raw.get_list("referralURLs"),
            alternate_authorization_dn: raw.get_string("authzDN"),
        }
    }
}

/// Assured replication level requested for local servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssuredReplicationLocalLevel {
    None,
    ReceivedAnyServer,
    ProcessedAllServers,
    /// Level name this crate does not know; carries the raw token.
    Other(String),
}

impl AssuredReplicationLocalLevel {
    fn from_wire(token: &str) -> Self {
        match token {
            "NONE" => Self::None,
            "RECEIVED_ANY_SERVER" => Self::ReceivedAnyServer,
            "PROCESSED_ALL_SERVERS" => Self::ProcessedAllServers,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Assured replication level requested for remote locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssuredReplicationRemoteLevel {
    None,
    ReceivedAnyRemoteLocation,
    ReceivedAllRemoteLocations,
    ProcessedAllRemoteServers,
    Other(String),
}

impl AssuredReplicationRemoteLevel {
    fn from_wire(token: &str) -> Self {
        match token {
            "NONE" => Self::None,
            "RECEIVED_ANY_REMOTE_LOCATION" => Self::ReceivedAnyRemoteLocation,
            "RECEIVED_ALL_REMOTE_LOCATIONS" => Self::ReceivedAllRemoteLocations,
            "PROCESSED_ALL_REMOTE_SERVERS" => Self::ProcessedAllRemoteServers,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Assured replication report on an ASSURANCE-COMPLETE line.
///
/// The parser surfaces the reported levels and flags as written; it computes
/// none of the replication semantics. `server_results` stays an opaque
/// string for the same reason.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssuranceFields {
    pub local_level: Option<AssuredReplicationLocalLevel>,
    pub remote_level: Option<AssuredReplicationRemoteLevel>,
    pub timeout_millis: Option<i64>,
    pub response_delayed_by_assurance: Option<bool>,
    pub local_assurance_satisfied: Option<bool>,
    pub remote_assurance_satisfied: Option<bool>,
    pub server_results: Option<String>,
}

impl AssuranceFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            local_level: raw
                .get("localAssuranceLevel")
                .map(AssuredReplicationLocalLevel::from_wire),
            remote_level: raw
                .get("remoteAssuranceLevel")
                .map(AssuredReplicationRemoteLevel::from_wire),
            timeout_millis: raw.get_long("assuranceTimeoutMillis"),
            response_delayed_by_assurance: raw.get_boolean("responseDelayedByAssurance"),
            local_assurance_satisfied: raw.get_boolean("localAssuranceSatisfied"),
            remote_assurance_satisfied: raw.get_boolean("remoteAssuranceSatisfied"),
            server_results: raw.get_string("serverAssuranceResults"),
        }
    }
}

/// Fields of a returned search entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryFields {
    pub operation_id: Option<i64>,
    pub message_id: Option<i32>,
    pub origin: Option<String>,
    pub dn: Option<String>,
}

impl EntryFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            operation_id: raw.get_long("op"),
            message_id: raw.get_int("msgID"),
            origin: raw.get_string("origin"),
            dn: raw.get_string("dn"),
        }
    }
}

/// Fields of a returned search reference.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReferenceFields {
    pub operation_id: Option<i64>,
    pub message_id: Option<i32>,
    pub origin: Option<String>,
    pub referral_urls: Vec<String>,
}

impl ReferenceFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            operation_id: raw.get_long("op"),
            message_id: raw.get_int("msgID"),
            origin: raw.get_string("origin"),
            referral_urls: raw.get_list("referralURLs"),
        }
    }
}

/// Fields of an intermediate response returned mid-operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IntermediateResponseFields {
    pub operation_id: Option<i64>,
    pub message_id: Option<i32>,
    pub origin: Option<String>,
    pub oid: Option<String>,
    pub name: Option<String>,
    pub value_string: Option<String>,
    pub response_control_oids: Vec<String>,
}

impl IntermediateResponseFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            operation_id: raw.get_long("op"),
            message_id: raw.get_int("msgID"),
            origin: raw.get_string("origin"),
            oid: raw.get_string("oid"),
            name: raw.get_string("name"),
            value_string: raw.get_string("value"),
            response_control_oids: raw.get_list("responseControls"),
        }
    }
}

/// Fields shared by both entry-rebalancing messages. These administrative
/// lines carry no connection id of their own; the triggering connection and
/// operation are referenced explicitly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebalancingFields {
    pub rebalancing_operation_id: Option<i64>,
    pub triggering_connection_id: Option<i64>,
    pub triggering_operation_id: Option<i64>,
    pub subtree_base_dn: Option<String>,
    pub size_limit: Option<i32>,
    pub source_backend_set_name: Option<String>,
    pub source_backend_server: Option<String>,
    pub target_backend_set_name: Option<String>,
    pub target_backend_server: Option<String>,
}

impl RebalancingFields {
    pub(crate) fn from_raw(raw: &RawLine) -> Self {
        Self {
            rebalancing_operation_id: raw.get_long("rebalancingOp"),
            triggering_connection_id: raw.get_long("triggeredByConn"),
            triggering_operation_id: raw.get_long("triggeredByOp"),
            subtree_base_dn: raw.get_string("base"),
            size_limit: raw.get_int("sizeLimit"),
            source_backend_set_name: raw.get_string("sourceBackendSet"),
            source_backend_server: raw.get_string("sourceServer"),
            target_backend_set_name: raw.get_string("targetBackendSet"),
            target_backend_server: raw.get_string("targetServer"),
        }
    }
}
