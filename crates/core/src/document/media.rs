/// Highest valid RTP payload type (7-bit field, RFC 3550 §5.1).
pub const MAX_PAYLOAD_TYPE: u8 = 127;

pub const DEFAULT_MEDIA_TYPE: &str = "video";
pub const DEFAULT_PROTOCOL: &str = "RTP/AVP";

/// One media stream to describe with an `m=` block (RFC 4566 §5.14).
///
/// ```text
/// m=<media_type> <port> <protocol> <payload_type>
/// b=RR:0
/// a=rtpmap:<payload_type> <rtpmap>
/// a=fmtp:<payload_type> <fmtp>
/// ```
///
/// `rtpmap` and `fmtp` are passed through untouched apart from the line
/// safety check; codec parameters are the caller's business.
#[derive(Debug, Clone)]
#[must_use]
pub struct MediaDescription {
    /// `audio`, `video`, ... Defaults to [`DEFAULT_MEDIA_TYPE`].
    pub media_type: Option<String>,
    /// Transport protocol. Defaults to [`DEFAULT_PROTOCOL`].
    pub protocol: Option<String>,
    /// Destination port.
    pub port: u16,
    /// RTP payload type, 0–127.
    pub payload_type: u8,
    /// Reserved: not reflected in the generated lines.
    pub bandwidth_independent: bool,
    /// Reserved: not reflected in the generated lines.
    pub bandwidth: Option<u32>,
    /// Codec map, e.g. `H264/90000` or `MPA/90000`.
    pub rtpmap: Option<String>,
    /// Format parameters, e.g. `packetization-mode=1`.
    pub fmtp: Option<String>,
}

impl MediaDescription {
    pub fn new(port: u16, payload_type: u8) -> Self {
        Self {
            media_type: None,
            protocol: None,
            port,
            payload_type,
            bandwidth_independent: false,
            bandwidth: None,
            rtpmap: None,
            fmtp: None,
        }
    }

    pub fn media_type(mut self, media_type: &str) -> Self {
        self.media_type = Some(media_type.to_string());
        self
    }

    pub fn protocol(mut self, protocol: &str) -> Self {
        self.protocol = Some(protocol.to_string());
        self
    }

    pub fn rtpmap(mut self, rtpmap: &str) -> Self {
        self.rtpmap = Some(rtpmap.to_string());
        self
    }

    pub fn fmtp(mut self, fmtp: &str) -> Self {
        self.fmtp = Some(fmtp.to_string());
        self
    }

    pub fn bandwidth(mut self, bandwidth: u32, independent: bool) -> Self {
        self.bandwidth = Some(bandwidth);
        self.bandwidth_independent = independent;
        self
    }
}
