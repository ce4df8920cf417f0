/// Product string advertised in `a=tool:` when none is configured.
pub const DEFAULT_TOOL: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Document-level configuration used by session initialization.
#[derive(Debug, Clone)]
pub struct SdpConfig {
    /// Software name and version for the `a=tool:` attribute (RFC 4566 §6).
    pub tool: String,
}

impl SdpConfig {
    pub fn with_tool(tool: &str) -> Self {
        Self {
            tool: tool.to_string(),
        }
    }
}

impl Default for SdpConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}
