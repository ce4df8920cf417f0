//! Local-host capabilities consumed by session initialization.
//!
//! The origin line (`o=`) needs the local host name and a session
//! identifier. Both come from the environment, so they are injected
//! through [`HostInfo`] and can be stubbed in tests.

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use socket2::SockAddr;

use crate::address::{NameInfo, NumericHost};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const FALLBACK_HOSTNAME: &str = "localhost";

/// Environment needed to build the session-level lines.
pub trait HostInfo: NameInfo {
    /// Host name advertised in the `o=` line.
    fn hostname(&self) -> String;

    /// Current time as a 64-bit NTP timestamp (RFC 5905 §6).
    ///
    /// Used verbatim as both the session id and the session version.
    fn ntp_time(&self) -> u64;
}

/// [`HostInfo`] backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl NameInfo for SystemHost {
    fn numeric_host(&self, addr: &SockAddr) -> io::Result<String> {
        NumericHost.numeric_host(addr)
    }
}

impl HostInfo for SystemHost {
    fn hostname(&self) -> String {
        match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read host name");
                FALLBACK_HOSTNAME.to_string()
            }
        }
    }

    fn ntp_time(&self) -> u64 {
        ntp_timestamp(SystemTime::now())
    }
}

/// Convert a wall-clock time to NTP 32.32 fixed point.
///
/// Times before the Unix epoch clamp to the epoch.
///
/// ```
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_millis(1500);
/// let ntp = sdp::host::ntp_timestamp(t);
/// assert_eq!(ntp >> 32, 2_208_988_801);
/// assert_eq!(ntp as u32, 1 << 31);
/// ```
pub fn ntp_timestamp(time: SystemTime) -> u64 {
    let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    let secs = since_unix.as_secs().wrapping_add(NTP_UNIX_OFFSET);
    let frac = (u64::from(since_unix.subsec_nanos()) << 32) / 1_000_000_000;
    (secs << 32) | frac
}
