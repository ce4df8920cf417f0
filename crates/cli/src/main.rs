use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;

use clap::Parser;
use sdp::{MediaDescription, SdpConfig, SessionDescription, SessionInfo, SystemHost};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sdp-announce",
    about = "Print an SDP session description for a stream announcement"
)]
struct Args {
    /// Session name (s=)
    #[arg(long)]
    name: Option<String>,

    /// Session information (i=)
    #[arg(long)]
    description: Option<String>,

    /// More-information URI (u=)
    #[arg(long)]
    url: Option<String>,

    /// Contact email (e=)
    #[arg(long)]
    email: Option<String>,

    /// Contact phone number (p=)
    #[arg(long)]
    phone: Option<String>,

    /// Session (destination) address, `ip` or `ip:port`
    #[arg(long, short, value_parser = parse_addr)]
    address: SocketAddr,

    /// Sending host for a source-specific multicast filter
    #[arg(long, value_parser = parse_addr)]
    source: Option<SocketAddr>,

    /// Product string for a=tool
    #[arg(long)]
    tool: Option<String>,

    /// Media stream, `type:port:pt[:rtpmap[:fmtp]]` (repeatable)
    #[arg(long, short, value_parser = parse_media)]
    media: Vec<MediaDescription>,

    /// Extra session attribute, `name[:value]` (repeatable)
    #[arg(long = "attribute")]
    attributes: Vec<String>,
}

fn parse_addr(s: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    s.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 0))
        .map_err(|e| format!("invalid address {:?}: {}", s, e))
}

fn parse_media(s: &str) -> Result<MediaDescription, String> {
    let mut parts = s.splitn(5, ':');
    let media_type = parts.next().filter(|t| !t.is_empty());
    let port = parts
        .next()
        .ok_or("missing port")?
        .parse::<u16>()
        .map_err(|e| format!("invalid port: {}", e))?;
    let pt = parts
        .next()
        .ok_or("missing payload type")?
        .parse::<u8>()
        .map_err(|e| format!("invalid payload type: {}", e))?;

    let mut media = MediaDescription::new(port, pt);
    if let Some(t) = media_type {
        media = media.media_type(t);
    }
    if let Some(rtpmap) = parts.next().filter(|v| !v.is_empty()) {
        media = media.rtpmap(rtpmap);
    }
    if let Some(fmtp) = parts.next().filter(|v| !v.is_empty()) {
        media = media.fmtp(fmtp);
    }
    Ok(media)
}

fn build(args: &Args) -> sdp::Result<SessionDescription> {
    let mut info = SessionInfo::new();
    if let Some(v) = &args.name {
        info = info.name(v.as_str());
    }
    if let Some(v) = &args.description {
        info = info.description(v.as_str());
    }
    if let Some(v) = &args.url {
        info = info.url(v.as_str());
    }
    if let Some(v) = &args.email {
        info = info.email(v.as_str());
    }
    if let Some(v) = &args.phone {
        info = info.phone(v.as_str());
    }

    let config = match &args.tool {
        Some(tool) => SdpConfig::with_tool(tool),
        None => SdpConfig::default(),
    };

    let source = args.source.map(socket2::SockAddr::from);
    let mut sdp = SessionDescription::start(
        &info,
        &args.address.into(),
        source.as_ref(),
        &SystemHost,
        &config,
    )?;

    for attr in &args.attributes {
        match attr.split_once(':') {
            Some((name, value)) => sdp.add_value(name, value)?,
            None => sdp.add_flag(attr)?,
        };
    }
    for media in &args.media {
        sdp.add_media(media)?;
    }
    Ok(sdp)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match build(&args) {
        Ok(sdp) => {
            tracing::info!(bytes = sdp.len(), streams = sdp.media_count(), "SDP generated");
            print!("{}", sdp);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to build SDP: {}", e);
            ExitCode::FAILURE
        }
    }
}
