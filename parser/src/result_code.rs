//! Canonical LDAP result codes.
//!
//! Result lines report a numeric `resultCode`; this table maps the numbers
//! to their symbolic constants. Numbers outside the table are preserved in
//! an [`ResultCode::Unrecognized`] wrapper rather than rejected, since
//! servers are free to emit codes this crate has never heard of.

use std::fmt;

use serde::Serialize;

macro_rules! result_codes {
    ($($code:literal => $variant:ident, $name:literal;)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum ResultCode {
            $($variant,)+
            /// A numeric code with no symbolic mapping; carries the raw value.
            Unrecognized(i32),
        }

        impl ResultCode {
            /// Map a numeric code to its symbolic constant. Never fails.
            pub fn from_code(code: i32) -> Self {
                match code {
                    $($code => ResultCode::$variant,)+
                    other => ResultCode::Unrecognized(other),
                }
            }

            /// The numeric value this code stands for.
            pub fn code(&self) -> i32 {
                match self {
                    $(ResultCode::$variant => $code,)+
                    ResultCode::Unrecognized(code) => *code,
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(ResultCode::$variant => $name,)+
                    ResultCode::Unrecognized(_) => "UNRECOGNIZED",
                }
            }
        }
    };
}

result_codes! {
    0 => Success, "SUCCESS";
    1 => OperationsError, "OPERATIONS_ERROR";
    2 => ProtocolError, "PROTOCOL_ERROR";
    3 => TimeLimitExceeded, "TIME_LIMIT_EXCEEDED";
    4 => SizeLimitExceeded, "SIZE_LIMIT_EXCEEDED";
    5 => CompareFalse, "COMPARE_FALSE";
    6 => CompareTrue, "COMPARE_TRUE";
    7 => AuthMethodNotSupported, "AUTH_METHOD_NOT_SUPPORTED";
    8 => StrongerAuthRequired, "STRONGER_AUTH_REQUIRED";
    10 => Referral, "REFERRAL";
    11 => AdminLimitExceeded, "ADMIN_LIMIT_EXCEEDED";
    12 => UnavailableCriticalExtension, "UNAVAILABLE_CRITICAL_EXTENSION";
    13 => ConfidentialityRequired, "CONFIDENTIALITY_REQUIRED";
    14 => SaslBindInProgress, "SASL_BIND_IN_PROGRESS";
    16 => NoSuchAttribute, "NO_SUCH_ATTRIBUTE";
    17 => UndefinedAttributeType, "UNDEFINED_ATTRIBUTE_TYPE";
    18 => InappropriateMatching, "INAPPROPRIATE_MATCHING";
    19 => ConstraintViolation, "CONSTRAINT_VIOLATION";
    20 => AttributeOrValueExists, "ATTRIBUTE_OR_VALUE_EXISTS";
    21 => InvalidAttributeSyntax, "INVALID_ATTRIBUTE_SYNTAX";
    32 => NoSuchObject, "NO_SUCH_OBJECT";
    33 => AliasProblem, "ALIAS_PROBLEM";
    34 => InvalidDnSyntax, "INVALID_DN_SYNTAX";
    36 => AliasDereferencingProblem, "ALIAS_DEREFERENCING_PROBLEM";
    48 => InappropriateAuthentication, "INAPPROPRIATE_AUTHENTICATION";
    49 => InvalidCredentials, "INVALID_CREDENTIALS";
    50 => InsufficientAccessRights, "INSUFFICIENT_ACCESS_RIGHTS";
    51 => Busy, "BUSY";
    52 => Unavailable, "UNAVAILABLE";
    53 => UnwillingToPerform, "UNWILLING_TO_PERFORM";
    54 => LoopDetect, "LOOP_DETECT";
    60 => SortControlMissing, "SORT_CONTROL_MISSING";
    61 => OffsetRangeError, "OFFSET_RANGE_ERROR";
    64 => NamingViolation, "NAMING_VIOLATION";
    65 => ObjectClassViolation, "OBJECT_CLASS_VIOLATION";
    66 => NotAllowedOnNonLeaf, "NOT_ALLOWED_ON_NON_LEAF";
    67 => NotAllowedOnRdn, "NOT_ALLOWED_ON_RDN";
    68 => EntryAlreadyExists, "ENTRY_ALREADY_EXISTS";
    69 => ObjectClassModsProhibited, "OBJECT_CLASS_MODS_PROHIBITED";
    71 => AffectsMultipleDsas, "AFFECTS_MULTIPLE_DSAS";
    76 => VirtualListViewError, "VIRTUAL_LIST_VIEW_ERROR";
    80 => Other, "OTHER";
    81 => ServerDown, "SERVER_DOWN";
    82 => LocalError, "LOCAL_ERROR";
    83 => EncodingError, "ENCODING_ERROR";
    84 => DecodingError, "DECODING_ERROR";
    85 => Timeout, "TIMEOUT";
    86 => AuthUnknown, "AUTH_UNKNOWN";
    87 => FilterError, "FILTER_ERROR";
    88 => UserCanceled, "USER_CANCELED";
    89 => ParamError, "PARAM_ERROR";
    90 => NoMemory, "NO_MEMORY";
    91 => ConnectError, "CONNECT_ERROR";
    92 => NotSupported, "NOT_SUPPORTED";
    93 => ControlNotFound, "CONTROL_NOT_FOUND";
    94 => NoResultsReturned, "NO_RESULTS_RETURNED";
    95 => MoreResultsToReturn, "MORE_RESULTS_TO_RETURN";
    96 => ClientLoop, "CLIENT_LOOP";
    97 => ReferralLimitExceeded, "REFERRAL_LIMIT_EXCEEDED";
    118 => Canceled, "CANCELED";
    119 => NoSuchOperation, "NO_SUCH_OPERATION";
    120 => TooLate, "TOO_LATE";
    121 => CannotCancel, "CANNOT_CANCEL";
    122 => AssertionFailed, "ASSERTION_FAILED";
    123 => AuthorizationDenied, "AUTHORIZATION_DENIED";
    4096 => ESyncRefreshRequired, "E_SYNC_REFRESH_REQUIRED";
    16654 => NoOperation, "NO_OPERATION";
    30221001 => InteractiveTransactionAborted, "INTERACTIVE_TRANSACTION_ABORTED";
    30221002 => DatabaseLockConflict, "DATABASE_LOCK_CONFLICT";
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Unrecognized(code) => write!(f, "{code}"),
            other => f.write_str(other.name()),
        }
    }
}
