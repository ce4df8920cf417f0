//! Line-safety checks for caller-supplied text.
//!
//! SDP is line oriented (RFC 4566 §5): a stray CR or LF inside a value
//! would start a new line and let the caller inject arbitrary fields.
//! The `a=charset:UTF-8` attribute emitted at session level also promises
//! that every value is well-formed UTF-8.

use crate::error::{Result, SdpError};

/// Returns `true` if `value` contains no CR, no LF and is valid UTF-8.
///
/// ```
/// assert!(sdp::validate::is_line_safe(b"My Stream"));
/// assert!(!sdp::validate::is_line_safe(b"evil\r\na=inject"));
/// assert!(!sdp::validate::is_line_safe(&[0xc3, 0x28]));
/// ```
pub fn is_line_safe(value: &[u8]) -> bool {
    !value.iter().any(|&b| b == b'\r' || b == b'\n') && std::str::from_utf8(value).is_ok()
}

/// Validate `value` and return it as text.
///
/// `field` names the offending input in the returned error.
pub fn line_safe<'a>(field: &'static str, value: &'a [u8]) -> Result<&'a str> {
    if value.iter().any(|&b| b == b'\r' || b == b'\n') {
        tracing::warn!(field, "line terminator in SDP field");
        return Err(SdpError::ValidationFailed { field });
    }
    std::str::from_utf8(value).map_err(|_| {
        tracing::warn!(field, "invalid UTF-8 in SDP field");
        SdpError::ValidationFailed { field }
    })
}
