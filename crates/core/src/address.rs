//! Socket address → SDP connection data (RFC 4566 §5.7).
//!
//! ```text
//! c=<nettype> <addrtype> <connection-address>
//!   IN IP4 192.0.2.10
//!   IN IP4 239.1.1.1/255     ← multicast, TTL placeholder
//!   IN IP6 2001:db8::1       ← scope id stripped
//! ```
//!
//! The multicast TTL suffix is obsolete in RFC 4566 but older receivers
//! still expect it, so a fixed `/255` is emitted.

use std::fmt;
use std::io;
use std::net::SocketAddr;

use socket2::{Domain, SockAddr};

use crate::error::AddressError;

/// Upper bound on a formatted connection address, `IN IP* ` prefix and
/// terminator included.
pub const MAX_SDP_ADDRESS: usize = 47;

const PREFIX_LEN: usize = "IN IP* ".len();

/// Room left for the numeric host text, terminator included. Checked
/// before any scope id is stripped.
const HOST_SLOT: usize = MAX_SDP_ADDRESS - PREFIX_LEN;

/// `sa_family` plus whatever precedes it (`sa_len` on BSD).
const FAMILY_TAG_LEN: usize = 2;

const SOCKADDR_IN_LEN: usize = 16;
const SOCKADDR_IN6_LEN: usize = 28;

/// Converts a binary socket address to its numeric host text.
///
/// Stands in for `getnameinfo(..., NI_NUMERICHOST)`. IPv6 results may carry
/// a `%scope` suffix; [`format_address`] strips it.
pub trait NameInfo {
    fn numeric_host(&self, addr: &SockAddr) -> io::Result<String>;
}

/// [`NameInfo`] backed by the standard library's address formatting.
///
/// Scope ids are rendered numerically (`fe80::1%2`). Text that would not
/// fit the host slot of a connection address is an error, as with an
/// undersized `getnameinfo` buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericHost;

impl NameInfo for NumericHost {
    fn numeric_host(&self, addr: &SockAddr) -> io::Result<String> {
        let len = addr.len() as usize;
        let host = match addr.as_socket() {
            Some(SocketAddr::V4(v4)) if len >= SOCKADDR_IN_LEN => v4.ip().to_string(),
            Some(SocketAddr::V6(v6)) if len >= SOCKADDR_IN6_LEN => {
                if v6.scope_id() != 0 {
                    format!("{}%{}", v6.ip(), v6.scope_id())
                } else {
                    v6.ip().to_string()
                }
            }
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "socket address truncated",
                ));
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    "address family not supported",
                ));
            }
        };

        if host.len() >= HOST_SLOT {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "numeric host does not fit the address slot",
            ));
        }
        Ok(host)
    }
}

/// IP version of a connection address, rendered as `IP4` / `IP6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The single-character marker used after `IP` (`'4'` or `'6'`).
    pub fn marker(self) -> char {
        match self {
            Self::V4 => '4',
            Self::V6 => '6',
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IP{}", self.marker())
    }
}

/// A formatted `IN IP4 ...` / `IN IP6 ...` connection value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionAddress {
    version: IpVersion,
    address: String,
}

impl ConnectionAddress {
    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// Address text after the `IN IP* ` prefix (including any `/255`).
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Display for ConnectionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IN {} {}", self.version, self.address)
    }
}

/// Format `addr` as an SDP connection address.
///
/// ## Examples
///
/// ```
/// use std::net::SocketAddr;
/// use sdp::address::{format_address, NumericHost};
///
/// let addr: SocketAddr = "239.1.1.1:5004".parse().unwrap();
/// let conn = format_address(&addr.into(), &NumericHost).unwrap();
/// assert_eq!(conn.to_string(), "IN IP4 239.1.1.1/255");
/// ```
pub fn format_address<R>(addr: &SockAddr, resolver: &R) -> Result<ConnectionAddress, AddressError>
where
    R: NameInfo + ?Sized,
{
    if (addr.len() as usize) < FAMILY_TAG_LEN {
        return Err(AddressError::MalformedAddress);
    }

    let mut host = resolver.numeric_host(addr).map_err(|e| {
        tracing::debug!(error = %e, "numeric host lookup failed");
        AddressError::MalformedAddress
    })?;
    if host.len() >= HOST_SLOT {
        return Err(AddressError::MalformedAddress);
    }

    let domain = addr.domain();
    let version = if domain == Domain::IPV4 {
        let multicast = addr
            .as_socket_ipv4()
            .is_some_and(|v4| v4.ip().is_multicast());
        if multicast {
            host.push_str("/255");
        }
        IpVersion::V4
    } else if domain == Domain::IPV6 {
        if let Some(pos) = host.find('%') {
            host.truncate(pos);
        }
        IpVersion::V6
    } else {
        return Err(AddressError::UnsupportedFamily);
    };

    if PREFIX_LEN + host.len() >= MAX_SDP_ADDRESS {
        return Err(AddressError::MalformedAddress);
    }

    Ok(ConnectionAddress {
        version,
        address: host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddrV4, SocketAddrV6};

    /// Returns a fixed string for any family.
    struct Fixed(&'static str);

    impl NameInfo for Fixed {
        fn numeric_host(&self, _: &SockAddr) -> io::Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl NameInfo for Failing {
        fn numeric_host(&self, _: &SockAddr) -> io::Result<String> {
            Err(io::Error::other("lookup failed"))
        }
    }

    fn sock(s: &str) -> SockAddr {
        s.parse::<SocketAddr>().unwrap().into()
    }

    fn zero_length() -> SockAddr {
        // SAFETY: the closure only shrinks the length; storage stays zeroed.
        let (_, addr) = unsafe {
            SockAddr::try_init(|_, len| {
                *len = 0;
                Ok(())
            })
        }
        .unwrap();
        addr
    }

    #[test]
    fn unicast_ipv4() {
        let conn = format_address(&sock("192.0.2.10:5004"), &NumericHost).unwrap();
        assert_eq!(conn.version(), IpVersion::V4);
        assert_eq!(conn.address(), "192.0.2.10");
        assert_eq!(conn.to_string(), "IN IP4 192.0.2.10");
    }

    #[test]
    fn multicast_ipv4_gets_ttl() {
        let conn = format_address(&sock("239.255.255.250:1900"), &NumericHost).unwrap();
        assert_eq!(conn.to_string(), "IN IP4 239.255.255.250/255");
    }

    #[test]
    fn ipv6_without_scope() {
        let conn = format_address(&sock("[2001:db8::1]:5004"), &NumericHost).unwrap();
        assert_eq!(conn.version(), IpVersion::V6);
        assert_eq!(conn.to_string(), "IN IP6 2001:db8::1");
    }

    #[test]
    fn ipv6_multicast_has_no_ttl() {
        let conn = format_address(&sock("[ff0e::1]:5004"), &NumericHost).unwrap();
        assert_eq!(conn.to_string(), "IN IP6 ff0e::1");
    }

    #[test]
    fn ipv6_scope_is_stripped() {
        let v6 = SocketAddrV6::new("fe80::1".parse().unwrap(), 5004, 0, 3);
        assert_eq!(NumericHost.numeric_host(&v6.into()).unwrap(), "fe80::1%3");

        let conn = format_address(&v6.into(), &NumericHost).unwrap();
        assert_eq!(conn.to_string(), "IN IP6 fe80::1");
    }

    #[test]
    fn named_scope_from_resolver_is_stripped() {
        let conn = format_address(&sock("[fe80::1]:0"), &Fixed("fe80::1%eth0")).unwrap();
        assert_eq!(conn.address(), "fe80::1");
    }

    #[test]
    fn too_short_for_family_tag() {
        assert_eq!(
            format_address(&zero_length(), &Fixed("1.2.3.4")),
            Err(AddressError::MalformedAddress)
        );
    }

    #[test]
    fn resolver_failure_is_malformed() {
        assert_eq!(
            format_address(&sock("10.0.0.1:1"), &Failing),
            Err(AddressError::MalformedAddress)
        );
    }

    #[test]
    fn oversized_host_is_malformed() {
        let long = "1234567890123456789012345678901234567890";
        assert_eq!(
            format_address(&sock("10.0.0.1:1"), &Fixed(long)),
            Err(AddressError::MalformedAddress)
        );
    }

    #[test]
    fn scoped_host_overflowing_slot_is_malformed() {
        let ip: Ipv6Addr = "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff".parse().unwrap();
        let addr: SockAddr = SocketAddrV6::new(ip, 1, 0, u32::MAX).into();
        assert!(NumericHost.numeric_host(&addr).is_err());
        assert_eq!(
            format_address(&addr, &NumericHost),
            Err(AddressError::MalformedAddress)
        );
        // Stripping the scope afterwards must not rescue an overflowing host.
        assert_eq!(
            format_address(&addr, &Fixed("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff%4294967295")),
            Err(AddressError::MalformedAddress)
        );
    }

    #[test]
    fn longest_ipv6_fits() {
        let conn = format_address(
            &sock("[ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff]:1"),
            &NumericHost,
        )
        .unwrap();
        assert!(conn.to_string().len() < MAX_SDP_ADDRESS);
    }

    #[cfg(unix)]
    #[test]
    fn unix_socket_is_rejected() {
        let addr = SockAddr::unix("/tmp/sdp.sock").unwrap();
        assert_eq!(
            format_address(&addr, &NumericHost),
            Err(AddressError::MalformedAddress)
        );
        assert_eq!(
            format_address(&addr, &Fixed("localhost")),
            Err(AddressError::UnsupportedFamily)
        );
    }

    proptest! {
        #[test]
        fn ipv4_prefix_and_ttl(octets in any::<[u8; 4]>(), port in any::<u16>()) {
            let ip = Ipv4Addr::from(octets);
            let conn = format_address(&SocketAddrV4::new(ip, port).into(), &NumericHost).unwrap();
            let text = conn.to_string();
            prop_assert!(text.starts_with("IN IP4 "));
            prop_assert_eq!(text.ends_with("/255"), ip.is_multicast());
            prop_assert!(text.len() < MAX_SDP_ADDRESS);
        }

        #[test]
        fn ipv6_scope_never_leaks(segments in any::<[u16; 8]>(), scope in 1u32..) {
            let ip = Ipv6Addr::from(segments);
            let addr = SocketAddrV6::new(ip, 5004, 0, scope);
            let scoped = format!("{}%{}", ip, scope);
            let result = format_address(&addr.into(), &NumericHost);
            if scoped.len() >= HOST_SLOT {
                prop_assert_eq!(result, Err(AddressError::MalformedAddress));
            } else {
                let text = result.unwrap().to_string();
                prop_assert!(text.starts_with("IN IP6 "));
                prop_assert!(!text.contains('%'));
                prop_assert_eq!(text, format!("IN IP6 {}", ip));
            }
        }
    }
}
