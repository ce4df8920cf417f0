/// Caller-supplied session metadata (RFC 4566 §5.3–§5.6).
///
/// Values are raw bytes because they typically come from user
/// configuration or the network; they are checked for line safety when
/// the document is started, not when they are set.
///
/// Only a field that was never set counts as absent. An explicitly empty
/// value is emitted as an empty line (`u=`), so leave optional fields unset
/// rather than passing `""`.
///
/// ```
/// use sdp::SessionInfo;
///
/// let info = SessionInfo::new()
///     .name("Test Stream")
///     .description("demo")
///     .url("http://example.com/stream");
/// ```
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct SessionInfo {
    pub(crate) name: Option<Vec<u8>>,
    pub(crate) description: Option<Vec<u8>>,
    pub(crate) url: Option<Vec<u8>>,
    pub(crate) email: Option<Vec<u8>>,
    pub(crate) phone: Option<Vec<u8>>,
}

/// `s=` value used when no name is supplied.
pub const DEFAULT_SESSION_NAME: &str = "Unnamed";

/// `i=` value used when no description is supplied.
pub const DEFAULT_DESCRIPTION: &str = "N/A";

impl SessionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session name (`s=`).
    pub fn name(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Free-text session information (`i=`).
    pub fn description(mut self, description: impl Into<Vec<u8>>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// URI with more information about the session (`u=`).
    pub fn url(mut self, url: impl Into<Vec<u8>>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Contact email (`e=`).
    pub fn email(mut self, email: impl Into<Vec<u8>>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Contact phone number (`p=`).
    pub fn phone(mut self, phone: impl Into<Vec<u8>>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
