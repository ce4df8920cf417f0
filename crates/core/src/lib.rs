//! Session Description Protocol (RFC 4566) generation for stream
//! announcements over RTSP, RTP and SAP.
//!
//! ```
//! use std::net::SocketAddr;
//! use sdp::{MediaDescription, SdpConfig, SessionDescription, SessionInfo, SystemHost};
//!
//! let group: SocketAddr = "239.1.1.1:5004".parse().unwrap();
//! let mut sdp = SessionDescription::start(
//!     &SessionInfo::new().name("Test Stream").description("demo"),
//!     &group.into(),
//!     None,
//!     &SystemHost,
//!     &SdpConfig::default(),
//! )?;
//! sdp.add_media(&MediaDescription::new(5004, 96).rtpmap("H264/90000"))?;
//! assert!(sdp.as_str().ends_with("a=rtpmap:96 H264/90000\r\n"));
//! # Ok::<(), sdp::SdpError>(())
//! ```

pub mod address;
pub mod config;
pub mod document;
pub mod error;
pub mod host;
pub mod validate;

pub use address::{ConnectionAddress, IpVersion, NameInfo, NumericHost, format_address};
pub use config::SdpConfig;
pub use document::{MediaDescription, SessionDescription, SessionInfo};
pub use error::{AddressError, ContractKind, Result, SdpError};
pub use host::{HostInfo, SystemHost};
