//! Error types for the SDP builder.

use std::collections::TryReserveError;
use std::fmt;

/// Errors that can occur while building a session description.
///
/// Every builder operation is all-or-nothing: when one of these is
/// returned, the document the caller already owns is left exactly as it
/// was before the call.
///
/// - **Input**: [`ValidationFailed`](Self::ValidationFailed): a text field
///   would break the line-oriented format.
/// - **Addressing**: [`AddressFormat`](Self::AddressFormat): the session
///   address could not be rendered.
/// - **Memory**: [`AllocationFailed`](Self::AllocationFailed).
/// - **Caller bugs**: [`ContractViolation`](Self::ContractViolation).
#[derive(Debug, thiserror::Error)]
pub enum SdpError {
    /// Field contains CR, LF or is not valid UTF-8.
    #[error("{field} is not a valid SDP line value")]
    ValidationFailed { field: &'static str },

    /// The session address could not be converted to its SDP form.
    #[error("address format error: {0}")]
    AddressFormat(#[from] AddressError),

    /// Growing the document buffer failed.
    #[error("allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    /// A precondition on the arguments was broken (e.g. payload type > 127).
    #[error("contract violation: {0}")]
    ContractViolation(ContractKind),
}

/// Why a binary socket address could not be formatted (RFC 4566 §5.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Too short to carry a family tag, or numeric host lookup failed.
    #[error("malformed socket address")]
    MalformedAddress,

    /// Neither `AF_INET` nor `AF_INET6`.
    #[error("unsupported address family")]
    UnsupportedFamily,
}

/// Specific precondition that was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    /// RTP payload types are 7 bits wide (RFC 3550 §5.1).
    PayloadTypeOutOfRange(u8),
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTypeOutOfRange(pt) => {
                write!(f, "payload type {} out of range 0-127", pt)
            }
        }
    }
}

/// Convenience alias for `Result<T, SdpError>`.
pub type Result<T> = std::result::Result<T, SdpError>;
