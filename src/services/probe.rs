//! Image-size resolution: the first phase of every placement.
//!
//! DESIGN
//! ======
//! A garment cannot be sized until its image's natural dimensions are
//! known. Image refs are either inline `data:` URLs (what the upload flow
//! produces) or remote `http(s)` URLs (seeded wardrobe items). Only the
//! encoded header is inspected; pixels are never decoded.
//!
//! Remote refs come from clients, so fetches are confined to public hosts:
//! IP literals are checked before the request is sent, hostnames are
//! resolved through `PublicOnlyResolver` (so a name cannot rebind to an
//! internal address between check and connect), and redirects are never
//! followed. `AppConfig::probe_allow_private_hosts` lifts the restriction
//! for local development.

use std::io::Cursor;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use placement::Size;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};

use crate::config::AppConfig;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The ref is neither a `data:` URL nor an `http(s)` URL.
    #[error("unsupported image ref: {0}")]
    UnsupportedRef(String),
    /// The ref points at a loopback, private, or otherwise internal host.
    #[error("image host not allowed: {0}")]
    ForbiddenHost(String),
    /// A `data:` URL was malformed or not base64-encoded.
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),
    /// The image could not be fetched.
    #[error("image fetch failed: {0}")]
    Fetch(String),
    /// The image host answered with a non-success status.
    #[error("image host error: status {status}")]
    Upstream { status: u16 },
    /// The image exceeds the configured byte limit.
    #[error("image larger than {limit} bytes")]
    TooLarge { limit: usize },
    /// The bytes are not a recognizable image.
    #[error("image decode failed: {0}")]
    Decode(String),
    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ProbeError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedRef(_) => "E_PROBE_UNSUPPORTED_REF",
            Self::ForbiddenHost(_) => "E_PROBE_FORBIDDEN_HOST",
            Self::InvalidDataUrl(_) => "E_PROBE_INVALID_DATA_URL",
            Self::Fetch(_) => "E_PROBE_FETCH",
            Self::Upstream { .. } => "E_PROBE_UPSTREAM",
            Self::TooLarge { .. } => "E_PROBE_TOO_LARGE",
            Self::Decode(_) => "E_PROBE_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

/// Resolves the natural (unscaled) size of an image ref.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn natural_size(&self, image_ref: &str) -> Result<Size, ProbeError>;
}

// =============================================================================
// HTTP PROBE
// =============================================================================

pub struct HttpImageProbe {
    http: reqwest::Client,
    max_bytes: usize,
    allow_private_hosts: bool,
}

impl HttpImageProbe {
    /// # Errors
    ///
    /// Returns `HttpClientBuild` if the reqwest client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.probe_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .redirect(reqwest::redirect::Policy::none());
        if !config.probe_allow_private_hosts {
            builder = builder.dns_resolver(Arc::new(PublicOnlyResolver));
        }
        let http = builder
            .build()
            .map_err(|e| ProbeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, max_bytes: config.probe_max_bytes, allow_private_hosts: config.probe_allow_private_hosts })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ProbeError> {
        let url = reqwest::Url::parse(url).map_err(|_| ProbeError::UnsupportedRef(truncate_ref(url)))?;
        if !self.allow_private_hosts {
            check_literal_host(&url)?;
        }

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Upstream { status: status.as_u16() });
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(ProbeError::TooLarge { limit: self.max_bytes });
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProbeError::Fetch(e.to_string()))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ProbeError::TooLarge { limit: self.max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn natural_size(&self, image_ref: &str) -> Result<Size, ProbeError> {
        let bytes = if image_ref.starts_with("data:") {
            let bytes = decode_data_url(image_ref)?;
            if bytes.len() > self.max_bytes {
                return Err(ProbeError::TooLarge { limit: self.max_bytes });
            }
            bytes
        } else if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            self.fetch(image_ref).await?
        } else {
            return Err(ProbeError::UnsupportedRef(truncate_ref(image_ref)));
        };

        dimensions_from_bytes(&bytes)
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Decode the payload of a base64 `data:` URL.
///
/// # Errors
///
/// Returns `InvalidDataUrl` if the URL has no `,` separator, is not
/// base64-encoded, or the payload does not decode.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, ProbeError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ProbeError::InvalidDataUrl("missing data: prefix".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ProbeError::InvalidDataUrl("missing ',' separator".into()))?;
    if !meta.to_ascii_lowercase().ends_with(";base64") {
        return Err(ProbeError::InvalidDataUrl("only base64 data urls are supported".into()));
    }

    let payload = payload.trim();
    STANDARD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| ProbeError::InvalidDataUrl(e.to_string()))
}

/// Read width and height from an encoded image header.
///
/// # Errors
///
/// Returns `Decode` if the format is unrecognized or the header is corrupt.
pub fn dimensions_from_bytes(bytes: &[u8]) -> Result<Size, ProbeError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;
    Ok(Size::new(f64::from(width), f64::from(height)))
}

// =============================================================================
// HOST POLICY
// =============================================================================

/// Whether `ip` is reachable on the public internet.
///
/// Loopback, private, shared (CGNAT), link-local, unspecified, broadcast,
/// documentation, multicast and unique-local ranges are all internal.
/// IPv4-mapped IPv6 addresses are judged by their IPv4 form.
#[must_use]
pub fn is_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_public_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_public_v4(v4),
            None => {
                !(v6.is_loopback()
                    || v6.is_unspecified()
                    || v6.is_multicast()
                    || v6.is_unique_local()
                    || v6.is_unicast_link_local())
            }
        },
    }
}

fn is_public_v4(v4: Ipv4Addr) -> bool {
    let [a, b, ..] = v4.octets();
    let this_network = a == 0;
    let shared = a == 100 && (b & 0xC0) == 64;
    !(this_network
        || shared
        || v4.is_loopback()
        || v4.is_private()
        || v4.is_link_local()
        || v4.is_unspecified()
        || v4.is_broadcast()
        || v4.is_documentation()
        || v4.is_multicast())
}

/// Reject URLs whose host is an internal IP literal. Hostnames pass here
/// and are filtered at resolution time.
fn check_literal_host(url: &reqwest::Url) -> Result<(), ProbeError> {
    let host = url
        .host_str()
        .ok_or_else(|| ProbeError::UnsupportedRef(truncate_ref(url.as_str())))?;
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    match literal.parse::<IpAddr>() {
        Ok(ip) if !is_public_ip(ip) => Err(ProbeError::ForbiddenHost(host.to_string())),
        _ => Ok(()),
    }
}

/// DNS resolver that drops every internal address from the answer.
struct PublicOnlyResolver;

impl Resolve for PublicOnlyResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(resolve_public(name.as_str().to_string()))
    }
}

async fn resolve_public(host: String) -> Result<Addrs, Box<dyn std::error::Error + Send + Sync>> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), 0))
        .await?
        .filter(|addr| is_public_ip(addr.ip()))
        .collect();
    if addrs.is_empty() {
        return Err(Box::new(ProbeError::ForbiddenHost(host)));
    }
    Ok(Box::new(addrs.into_iter()))
}

fn truncate_ref(image_ref: &str) -> String {
    image_ref.chars().take(64).collect()
}

#[cfg(test)]
#[path = "probe_test.rs"]
mod tests;
