//! SDP document construction (RFC 4566).
//!
//! A [`SessionDescription`] is started with the session-level lines and
//! then grown one attribute or media block at a time:
//!
//! ```text
//! v=0                                           ← protocol version
//! o=- <ntp> <ntp> IN IP4 <hostname>             ← origin
//! s=<name>                                      ← session name
//! i=<description>                               ← session information
//! u=<url>                                       ← optional
//! e=<email>                                     ← optional
//! p=<phone>                                     ← optional
//! c=IN IP4 <address>[/255]                      ← connection data
//! t=0 0                                         ← permanent session
//! a=tool:<product>
//! a=recvonly
//! a=type:broadcast
//! a=charset:UTF-8
//! a=source-filter: incl IN IP4 * <source>       ← optional (RFC 4570)
//! m=video 5004 RTP/AVP 96                       ← per add_media call
//! b=RR:0
//! a=rtpmap:96 H264/90000
//! ```
//!
//! Every append measures its output first, grows the buffer by exactly
//! that many bytes and only then writes. A failed append leaves the
//! document byte-for-byte unchanged.

pub mod media;
pub mod session;

use std::fmt::{self, Write as _};

use socket2::SockAddr;

use crate::address::{ConnectionAddress, format_address};
use crate::config::SdpConfig;
use crate::error::{ContractKind, Result, SdpError};
use crate::host::HostInfo;
use crate::validate::line_safe;

pub use media::{MAX_PAYLOAD_TYPE, MediaDescription};
pub use session::SessionInfo;

/// Byte counter used to size an append before touching the buffer.
#[derive(Default)]
struct Meter {
    len: usize,
    line_break: bool,
}

impl fmt::Write for Meter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.len += s.len();
        self.line_break |= s.contains(['\r', '\n']);
        Ok(())
    }
}

/// Session-level lines, rendered once to measure and once to write.
struct Skeleton<'a> {
    ntp: u64,
    hostname: &'a str,
    name: &'a str,
    description: &'a str,
    url: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    connection: &'a ConnectionAddress,
    tool: &'a str,
    source: Option<&'a ConnectionAddress>,
}

impl fmt::Display for Skeleton<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v=0\r\n")?;
        write!(
            f,
            "o=- {} {} IN {} {}\r\n",
            self.ntp,
            self.ntp,
            self.connection.version(),
            self.hostname
        )?;
        write!(f, "s={}\r\n", self.name)?;
        write!(f, "i={}\r\n", self.description)?;
        if let Some(url) = self.url {
            write!(f, "u={}\r\n", url)?;
        }
        if let Some(email) = self.email {
            write!(f, "e={}\r\n", email)?;
        }
        if let Some(phone) = self.phone {
            write!(f, "p={}\r\n", phone)?;
        }
        write!(f, "c={}\r\n", self.connection)?;
        // One permanent span: no repeat times, zone adjustments or keys.
        write!(f, "t=0 0\r\n")?;
        write!(f, "a=tool:{}\r\n", self.tool)?;
        write!(f, "a=recvonly\r\n")?;
        write!(f, "a=type:broadcast\r\n")?;
        write!(f, "a=charset:UTF-8\r\n")?;
        if let Some(source) = self.source {
            write!(
                f,
                "a=source-filter: incl IN {} * {}\r\n",
                source.version(),
                source.address()
            )?;
        }
        Ok(())
    }
}

/// An SDP document under construction.
///
/// Always holds a well-formed prefix of a session description: every line
/// ends in CRLF and every value has passed the line-safety check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    buf: String,
    media_count: usize,
}

impl SessionDescription {
    /// Build the session-level part of the document.
    ///
    /// `addr` is the session (destination) address for `c=`. `source` is
    /// the sending machine for a source-specific multicast filter; if it
    /// cannot be formatted the filter line is left out and the call still
    /// succeeds.
    ///
    /// ## Examples
    ///
    /// ```
    /// use std::net::SocketAddr;
    /// use sdp::{SdpConfig, SessionDescription, SessionInfo, SystemHost};
    ///
    /// let addr: SocketAddr = "239.1.1.1:5004".parse().unwrap();
    /// let sdp = SessionDescription::start(
    ///     &SessionInfo::new().name("Test Stream"),
    ///     &addr.into(),
    ///     None,
    ///     &SystemHost,
    ///     &SdpConfig::default(),
    /// )
    /// .unwrap();
    /// assert!(sdp.as_str().contains("c=IN IP4 239.1.1.1/255\r\n"));
    /// ```
    pub fn start<H>(
        info: &SessionInfo,
        addr: &SockAddr,
        source: Option<&SockAddr>,
        host: &H,
        config: &SdpConfig,
    ) -> Result<Self>
    where
        H: HostInfo + ?Sized,
    {
        let name = line_safe(
            "name",
            info.name
                .as_deref()
                .unwrap_or(session::DEFAULT_SESSION_NAME.as_bytes()),
        )?;
        let description = line_safe(
            "description",
            info.description
                .as_deref()
                .unwrap_or(session::DEFAULT_DESCRIPTION.as_bytes()),
        )?;
        let url = info.url.as_deref().map(|v| line_safe("url", v)).transpose()?;
        let email = info
            .email
            .as_deref()
            .map(|v| line_safe("email", v))
            .transpose()?;
        let phone = info
            .phone
            .as_deref()
            .map(|v| line_safe("phone", v))
            .transpose()?;

        let connection = format_address(addr, host)?;

        let source = source.and_then(|src| match format_address(src, host) {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::debug!(error = %e, "omitting source-filter");
                None
            }
        });

        let hostname = host.hostname();
        let skeleton = Skeleton {
            ntp: host.ntp_time(),
            hostname: line_safe("hostname", hostname.as_bytes())?,
            name,
            description,
            url,
            email,
            phone,
            connection: &connection,
            tool: line_safe("tool", config.tool.as_bytes())?,
            source: source.as_ref(),
        };

        let mut sdp = SessionDescription {
            buf: String::new(),
            media_count: 0,
        };
        sdp.append("session", |w| write!(w, "{}", skeleton))?;

        tracing::debug!(len = sdp.len(), "SDP session started:\n{}", sdp.buf);
        Ok(sdp)
    }

    /// Append `a=<name>` or `a=<name>:<value>`.
    ///
    /// The value is any `format_args!` expression, so argument types are
    /// checked at compile time.
    ///
    /// ```
    /// # use std::net::SocketAddr;
    /// # use sdp::{SdpConfig, SessionDescription, SessionInfo, SystemHost};
    /// # let addr: SocketAddr = "10.0.0.1:5004".parse().unwrap();
    /// # let mut sdp = SessionDescription::start(
    /// #     &SessionInfo::new(), &addr.into(), None, &SystemHost, &SdpConfig::default(),
    /// # ).unwrap();
    /// sdp.add_attribute("framerate", Some(format_args!("{:.2}", 29.97)))?;
    /// sdp.add_attribute("sendonly", None)?;
    /// assert!(sdp.as_str().ends_with("a=framerate:29.97\r\na=sendonly\r\n"));
    /// # Ok::<(), sdp::SdpError>(())
    /// ```
    pub fn add_attribute(
        &mut self,
        name: &str,
        value: Option<fmt::Arguments<'_>>,
    ) -> Result<&mut Self> {
        if name.is_empty() {
            return Err(SdpError::ValidationFailed {
                field: "attribute name",
            });
        }
        line_safe("attribute name", name.as_bytes())?;

        match value {
            None => self.append("attribute", |w| write!(w, "a={}\r\n", name))?,
            Some(value) => {
                let mut meter = Meter::default();
                if meter.write_fmt(value).is_err() || meter.line_break {
                    tracing::warn!(name, "rejected SDP attribute value");
                    return Err(SdpError::ValidationFailed {
                        field: "attribute value",
                    });
                }
                let mark = self.buf.len();
                self.append("attribute", |w| write!(w, "a={}:{}\r\n", name, value))?;

                // The value is rendered again for the write; re-check what landed.
                let written = &self.buf[mark..];
                let body = written.strip_suffix("\r\n").unwrap_or(written);
                if body.contains(['\r', '\n']) {
                    self.buf.truncate(mark);
                    tracing::warn!(name, "rejected SDP attribute value");
                    return Err(SdpError::ValidationFailed {
                        field: "attribute value",
                    });
                }
            }
        }

        tracing::trace!(name, "attribute appended");
        Ok(self)
    }

    /// Append a property attribute with no value (`a=<name>`).
    pub fn add_flag(&mut self, name: &str) -> Result<&mut Self> {
        self.add_attribute(name, None)
    }

    /// Append `a=<name>:<value>` with a pre-formatted value.
    pub fn add_value(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.add_attribute(name, Some(format_args!("{}", value)))
    }

    /// Append an `m=` block: media line, `b=RR:0`, then `a=rtpmap` and
    /// `a=fmtp` for the payload type when present.
    ///
    /// Fails with [`SdpError::ContractViolation`] for payload types above
    /// [`MAX_PAYLOAD_TYPE`]. If any line fails, none of the block is kept.
    pub fn add_media(&mut self, media: &MediaDescription) -> Result<&mut Self> {
        let pt = media.payload_type;
        if pt > MAX_PAYLOAD_TYPE {
            tracing::error!(payload_type = pt, "RTP payload type out of range");
            return Err(SdpError::ContractViolation(
                ContractKind::PayloadTypeOutOfRange(pt),
            ));
        }

        let media_type = line_safe(
            "media type",
            media
                .media_type
                .as_deref()
                .unwrap_or(media::DEFAULT_MEDIA_TYPE)
                .as_bytes(),
        )?;
        let protocol = line_safe(
            "protocol",
            media
                .protocol
                .as_deref()
                .unwrap_or(media::DEFAULT_PROTOCOL)
                .as_bytes(),
        )?;

        let mark = self.buf.len();
        if let Err(e) = self.append_media(media, media_type, protocol) {
            self.buf.truncate(mark);
            return Err(e);
        }

        self.media_count += 1;
        tracing::debug!(media = media_type, port = media.port, pt, "media appended");
        Ok(self)
    }

    fn append_media(
        &mut self,
        media: &MediaDescription,
        media_type: &str,
        protocol: &str,
    ) -> Result<()> {
        let pt = media.payload_type;
        self.append("media", |w| {
            write!(
                w,
                "m={} {} {} {}\r\nb=RR:0\r\n",
                media_type, media.port, protocol, pt
            )
        })?;

        if let Some(rtpmap) = &media.rtpmap {
            self.add_attribute("rtpmap", Some(format_args!("{} {}", pt, rtpmap)))?;
        }
        if let Some(fmtp) = &media.fmtp {
            self.add_attribute("fmtp", Some(format_args!("{} {}", pt, fmtp)))?;
        }
        Ok(())
    }

    /// Measure `render`, grow the buffer by exactly that much, then write.
    fn append<F>(&mut self, what: &'static str, render: F) -> Result<()>
    where
        F: Fn(&mut dyn fmt::Write) -> fmt::Result,
    {
        let mut meter = Meter::default();
        render(&mut meter).map_err(|_| SdpError::ValidationFailed { field: what })?;

        self.buf.try_reserve_exact(meter.len)?;

        let mark = self.buf.len();
        if render(&mut self.buf).is_err() {
            self.buf.truncate(mark);
            return Err(SdpError::ValidationFailed { field: what });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of `m=` blocks appended so far.
    pub fn media_count(&self) -> usize {
        self.media_count
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Consume the document for transmission.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl AsRef<str> for SessionDescription {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl From<SessionDescription> for String {
    fn from(sdp: SessionDescription) -> Self {
        sdp.buf
    }
}
