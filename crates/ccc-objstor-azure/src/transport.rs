// crates/ccc-objstor-azure/src/transport.rs
// ============================================================================
// Module: TLS Probe Transport
// Description: Minimal HTTP/1.1 GET with pinned TLS protocol versions.
// Purpose: Observe negotiated TLS versions and protocol rejections.
// Dependencies: ccc-objstor-core, openssl, rustls, rustls-pki-types, webpki-roots, url
// ============================================================================

//! ## Overview
//! The probes need two things a general HTTP client hides: the negotiated TLS
//! version and control over which versions are offered. This transport opens
//! one connection per request, offers only the versions inside the requested
//! range, sends `Connection: close`, and reads the response to the end.
//!
//! Ranges that admit TLS 1.2 or 1.3 go through rustls. Ranges that admit only
//! TLS 1.0 or 1.1 go through OpenSSL with the legacy cipher suites enabled,
//! since rustls implements neither version. A failed handshake surfaces as
//! [`CloudError::Request`].
//!
//! The status text is the status code followed by the first line of the
//! Storage error `<Message>` when the body carries one, else the reason
//! phrase. The body itself is discarded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::sync::Arc;
use std::time::Duration;

use ccc_objstor_core::CloudError;
use ccc_objstor_core::HttpTransport;
use ccc_objstor_core::ProbeRequest;
use ccc_objstor_core::ProbeResponse;
use ccc_objstor_core::ResponseHeaders;
use ccc_objstor_core::TlsVersion;
use openssl::error::ErrorStack;
use openssl::ssl::SslConnector;
use openssl::ssl::SslMethod;
use openssl::ssl::SslVersion;
use rustls::ClientConfig;
use rustls::ClientConnection;
use rustls::ProtocolVersion;
use rustls::RootCertStore;
use rustls::StreamOwned;
use rustls::SupportedProtocolVersion;
use rustls::crypto::CryptoProvider;
use rustls_pki_types::ServerName;
use url::Url;

use crate::client::USER_AGENT;
use crate::client::storage_error_message;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest response read from the wire.
pub const MAX_RESPONSE_BYTES: u64 = 1024 * 1024;
/// Header/body separator.
const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Cipher list admitting the suites TLS 1.0 and 1.1 servers negotiate.
const LEGACY_CIPHERS: &str = "DEFAULT@SECLEVEL=0";

/// Protocol versions rustls can offer, oldest first.
static OFFERABLE: [(TlsVersion, &SupportedProtocolVersion); 2] =
    [(TlsVersion::Tls12, &rustls::version::TLS12), (TlsVersion::Tls13, &rustls::version::TLS13)];

// ============================================================================
// SECTION: Transport
// ============================================================================

/// HTTP/1.1 probe transport over rustls, with OpenSSL for legacy versions.
pub struct TlsTransport {
    /// Connect, read, and write timeout.
    timeout: Duration,
    /// Trusted roots.
    roots: Arc<RootCertStore>,
    /// Cryptography provider.
    provider: Arc<CryptoProvider>,
}

impl TlsTransport {
    /// Creates a transport trusting the Mozilla root program.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self {
            timeout,
            roots: Arc::new(roots),
            provider: Arc::new(rustls::crypto::aws_lc_rs::default_provider()),
        }
    }

    /// Builds a rustls configuration offering `versions`.
    fn client_config(
        &self,
        versions: &[&'static SupportedProtocolVersion],
    ) -> Result<ClientConfig, CloudError> {
        Ok(ClientConfig::builder_with_provider(Arc::clone(&self.provider))
            .with_protocol_versions(versions)
            .map_err(|err| CloudError::Request(format!("tls config: {err}")))?
            .with_root_certificates(Arc::clone(&self.roots))
            .with_no_client_auth())
    }

    /// Sends the request over rustls.
    fn get_modern(
        &self,
        versions: &[&'static SupportedProtocolVersion],
        host: &str,
        port: u16,
        raw: &[u8],
    ) -> Result<ProbeResponse, CloudError> {
        let config = self.client_config(versions)?;
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|err| CloudError::Request(format!("server name {host}: {err}")))?;
        let connection = ClientConnection::new(Arc::new(config), server_name)
            .map_err(|err| CloudError::Request(format!("tls: {err}")))?;
        let mut stream = StreamOwned::new(connection, self.connect(host, port)?);
        let bytes = exchange(&mut stream, raw)?;
        let negotiated = stream.conn.protocol_version().and_then(wire_version);
        parse_response(&bytes, negotiated)
    }

    /// Sends the request over OpenSSL pinned to a TLS 1.0/1.1 range.
    fn get_legacy(
        &self,
        min: Option<TlsVersion>,
        max: Option<TlsVersion>,
        host: &str,
        port: u16,
        raw: &[u8],
    ) -> Result<ProbeResponse, CloudError> {
        let connector = legacy_connector(min, max)?;
        let tcp = self.connect(host, port)?;
        let mut stream = connector
            .connect(host, tcp)
            .map_err(|err| CloudError::Request(format!("tls: {err}")))?;
        let bytes = exchange(&mut stream, raw)?;
        let negotiated = stream.ssl().version2().and_then(legacy_wire_version);
        parse_response(&bytes, negotiated)
    }

    /// Opens a TCP connection to the first reachable address.
    fn connect(&self, host: &str, port: u16) -> Result<TcpStream, CloudError> {
        let addresses = (host, port)
            .to_socket_addrs()
            .map_err(|err| CloudError::Request(format!("resolve {host}: {err}")))?;
        let mut last_error = CloudError::Request(format!("no addresses for {host}"));
        for address in addresses {
            match TcpStream::connect_timeout(&address, self.timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.timeout))
                        .and_then(|()| stream.set_write_timeout(Some(self.timeout)))
                        .map_err(|err| CloudError::Request(err.to_string()))?;
                    return Ok(stream);
                }
                Err(err) => last_error = CloudError::Request(format!("connect {address}: {err}")),
            }
        }
        Err(last_error)
    }
}

impl HttpTransport for TlsTransport {
    fn get(&self, request: &ProbeRequest) -> Result<ProbeResponse, CloudError> {
        let url = Url::parse(&request.url)
            .map_err(|err| CloudError::Request(format!("invalid url {}: {err}", request.url)))?;
        let host = url
            .host_str()
            .ok_or_else(|| CloudError::Request(format!("url has no host: {url}")))?
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| CloudError::Request(format!("url has no port: {url}")))?;
        let raw = request_bytes(&url, &host, &request.headers);
        match url.scheme() {
            "http" => {
                let mut stream = self.connect(&host, port)?;
                let bytes = exchange(&mut stream, &raw)?;
                parse_response(&bytes, None)
            }
            "https" => {
                let versions = offerable(request.min_tls, request.max_tls);
                if versions.is_empty() {
                    self.get_legacy(request.min_tls, request.max_tls, &host, port, &raw)
                } else {
                    self.get_modern(&versions, &host, port, &raw)
                }
            }
            other => Err(CloudError::Request(format!("unsupported scheme: {other}"))),
        }
    }
}

// ============================================================================
// SECTION: Wire Helpers
// ============================================================================

/// Returns the rustls versions inside `min..=max`.
fn offerable(
    min: Option<TlsVersion>,
    max: Option<TlsVersion>,
) -> Vec<&'static SupportedProtocolVersion> {
    OFFERABLE
        .iter()
        .filter(|(version, _)| {
            min.is_none_or(|min| *version >= min) && max.is_none_or(|max| *version <= max)
        })
        .map(|(_, supported)| *supported)
        .collect()
}

/// Builds an OpenSSL connector pinned to `min..=max`, defaulting to TLS 1.0..=1.1.
fn legacy_connector(
    min: Option<TlsVersion>,
    max: Option<TlsVersion>,
) -> Result<SslConnector, CloudError> {
    let config_error = |err: ErrorStack| CloudError::Request(format!("tls config: {err}"));
    let mut builder = SslConnector::builder(SslMethod::tls_client()).map_err(config_error)?;
    builder
        .set_min_proto_version(Some(ssl_version(min.unwrap_or(TlsVersion::Tls10))))
        .map_err(config_error)?;
    builder
        .set_max_proto_version(Some(ssl_version(max.unwrap_or(TlsVersion::Tls11))))
        .map_err(config_error)?;
    builder.set_cipher_list(LEGACY_CIPHERS).map_err(config_error)?;
    Ok(builder.build())
}

/// Maps a probe version to the OpenSSL protocol constant.
const fn ssl_version(version: TlsVersion) -> SslVersion {
    match version {
        TlsVersion::Tls10 => SslVersion::TLS1,
        TlsVersion::Tls11 => SslVersion::TLS1_1,
        TlsVersion::Tls12 => SslVersion::TLS1_2,
        TlsVersion::Tls13 => SslVersion::TLS1_3,
    }
}

/// Maps a negotiated OpenSSL version to its wire code.
fn legacy_wire_version(version: SslVersion) -> Option<u16> {
    [TlsVersion::Tls10, TlsVersion::Tls11, TlsVersion::Tls12, TlsVersion::Tls13]
        .into_iter()
        .find(|known| ssl_version(*known) == version)
        .map(TlsVersion::wire)
}

/// Maps a negotiated rustls version to its wire code.
fn wire_version(version: ProtocolVersion) -> Option<u16> {
    let known = match version {
        ProtocolVersion::TLSv1_0 => TlsVersion::Tls10,
        ProtocolVersion::TLSv1_1 => TlsVersion::Tls11,
        ProtocolVersion::TLSv1_2 => TlsVersion::Tls12,
        ProtocolVersion::TLSv1_3 => TlsVersion::Tls13,
        _ => return None,
    };
    Some(known.wire())
}

/// Serializes the GET request.
fn request_bytes(url: &Url, host: &str, headers: &[(String, String)]) -> Vec<u8> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    let authority = url.port().map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
    let mut head = format!(
        "GET {target} HTTP/1.1\r\nHost: {authority}\r\nUser-Agent: {USER_AGENT}\r\nAccept: */*\r\n\
         Connection: close\r\n"
    );
    for (name, value) in headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    head.into_bytes()
}

/// Writes the request and reads the response until the peer closes.
fn exchange<S: Read + Write>(stream: &mut S, request: &[u8]) -> Result<Vec<u8>, CloudError> {
    stream
        .write_all(request)
        .and_then(|()| stream.flush())
        .map_err(|err| CloudError::Request(err.to_string()))?;
    let mut buffer = Vec::new();
    match Read::by_ref(stream).take(MAX_RESPONSE_BYTES).read_to_end(&mut buffer) {
        Ok(_) => Ok(buffer),
        // Peers that close without a TLS close_notify still delivered a response.
        Err(err) if err.kind() == ErrorKind::UnexpectedEof && !buffer.is_empty() => Ok(buffer),
        Err(err) => Err(CloudError::Request(err.to_string())),
    }
}

/// Parses a buffered HTTP/1.1 response.
pub(crate) fn parse_response(
    bytes: &[u8],
    tls_version: Option<u16>,
) -> Result<ProbeResponse, CloudError> {
    let split = bytes
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
        .ok_or_else(|| CloudError::Decode("incomplete http response head".to_string()))?;
    let head = String::from_utf8_lossy(&bytes[..split]);
    let raw_body = &bytes[split + HEAD_TERMINATOR.len()..];
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let mut parts = status_line.splitn(3, ' ');
    let _version = parts.next();
    let status_code = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| CloudError::Decode(format!("invalid status line: {status_line}")))?;
    let reason = parts.next().unwrap_or_default().trim().to_string();
    let mut headers = ResponseHeaders::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim(), value.trim());
        }
    }
    let chunked = headers
        .get("transfer-encoding")
        .is_some_and(|encoding| encoding.eq_ignore_ascii_case("chunked"));
    let body = if chunked { dechunk(raw_body) } else { raw_body.to_vec() };
    let text = String::from_utf8_lossy(&body);
    let detail = storage_error_message(text.trim_start_matches('\u{feff}')).unwrap_or(reason);
    let status =
        if detail.is_empty() { status_code.to_string() } else { format!("{status_code} {detail}") };
    Ok(ProbeResponse {
        status_code,
        status,
        headers,
        tls_version,
    })
}

/// Decodes a chunked body, keeping whatever arrived before a malformed chunk.
fn dechunk(mut raw: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    while let Some(line_end) = raw.windows(2).position(|window| window == b"\r\n") {
        let size_line = String::from_utf8_lossy(&raw[..line_end]);
        let size_field = size_line.split(';').next().unwrap_or_default().trim();
        let Ok(size) = usize::from_str_radix(size_field, 16) else {
            break;
        };
        let start = line_end + 2;
        if size == 0 || raw.len() < start + size {
            break;
        }
        body.extend_from_slice(&raw[start..start + size]);
        raw = raw.get(start + size + 2..).unwrap_or_default();
    }
    body
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
