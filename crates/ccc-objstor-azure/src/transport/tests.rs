// crates/ccc-objstor-azure/src/transport/tests.rs
// ============================================================================
// Module: TLS Probe Transport Unit Tests
// Description: Tests for response parsing, version pinning, and plain exchanges.
// Purpose: Validate status text, chunked bodies, and unofferable version ranges.
// Dependencies: ccc-objstor-azure
// ============================================================================

//! ## Overview
//! Tests run the transport against local TCP listeners. No test reaches the
//! network.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::Duration;

use ccc_objstor_core::CloudError;
use ccc_objstor_core::HttpTransport;
use ccc_objstor_core::ProbeRequest;
use ccc_objstor_core::TlsVersion;
use openssl::ssl::SslVersion;
use rustls::ProtocolVersion;

use super::TlsTransport;
use super::dechunk;
use super::legacy_wire_version;
use super::offerable;
use super::parse_response;
use super::wire_version;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serves one raw HTTP response and returns the request head it received.
fn raw_http_server(response: &'static [u8]) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut byte = [0_u8; 1];
        while !head.ends_with(b"\r\n\r\n") {
            if stream.read(&mut byte).unwrap() == 0 {
                break;
            }
            head.push(byte[0]);
        }
        stream.write_all(response).unwrap();
        String::from_utf8(head).unwrap()
    });
    (format!("http://{addr}"), handle)
}

/// Accepts one connection and returns the first bytes of the client hello.
fn client_hello_server() -> (String, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut hello = vec![0_u8; 11];
        stream.read_exact(&mut hello).unwrap();
        hello
    });
    (format!("https://{addr}"), handle)
}

fn get_request(
    url: String,
    min_tls: Option<TlsVersion>,
    max_tls: Option<TlsVersion>,
) -> ProbeRequest {
    ProbeRequest {
        url,
        headers: vec![("x-ms-version".to_string(), "2025-01-05".to_string())],
        min_tls,
        max_tls,
    }
}

// ============================================================================
// SECTION: Response Parsing
// ============================================================================

/// Tests the storage error message replaces the reason phrase.
#[test]
fn status_text_uses_storage_message() {
    let raw = b"HTTP/1.1 403 Forbidden\r\nx-ms-error-code: AuthorizationFailure\r\n\r\n\
                <?xml version=\"1.0\"?><Error><Code>AuthorizationFailure</Code>\
                <Message>This request is not authorized to perform this operation.\n\
                RequestId:1</Message></Error>";

    let response = parse_response(raw, Some(0x0303)).unwrap();

    assert_eq!(response.status_code, 403);
    assert_eq!(response.status, "403 This request is not authorized to perform this operation.");
    assert_eq!(response.headers.get("x-ms-error-code"), Some("AuthorizationFailure"));
    assert_eq!(response.tls_version, Some(0x0303));
}

/// Tests the reason phrase is used when the body has no storage message.
#[test]
fn status_text_falls_back_to_reason() {
    let response = parse_response(b"HTTP/1.1 400 Bad Request\r\n\r\n", None).unwrap();

    assert_eq!(response.status, "400 Bad Request");
    assert_eq!(response.tls_version, None);
}

/// Tests chunked bodies are decoded before the message is extracted.
#[test]
fn chunked_body_is_decoded() {
    let raw = b"HTTP/1.1 409 Conflict\r\nTransfer-Encoding: chunked\r\n\r\n\
                15\r\n<Error><Message>Tls i\r\n\
                1b\r\ns too old</Message></Error>\r\n0\r\n\r\n";

    let response = parse_response(raw, None).unwrap();

    assert_eq!(response.status, "409 Tls is too old");
}

/// Tests truncated chunks keep the data received so far.
#[test]
fn dechunk_stops_at_malformed_chunk() {
    assert_eq!(dechunk(b"3\r\nabc\r\nzz\r\nignored"), b"abc");
    assert_eq!(dechunk(b"a\r\nshort"), b"");
}

/// Tests a response without a header terminator is rejected.
#[test]
fn incomplete_head_is_a_decode_error() {
    let err = parse_response(b"HTTP/1.1 200 OK\r\nServer: x", None).unwrap_err();

    assert!(matches!(err, CloudError::Decode(_)));
}

/// Tests negotiated versions map to their wire codes.
#[test]
fn negotiated_versions_map_to_wire_codes() {
    assert_eq!(wire_version(ProtocolVersion::TLSv1_2), Some(0x0303));
    assert_eq!(wire_version(ProtocolVersion::TLSv1_3), Some(0x0304));
    assert_eq!(wire_version(ProtocolVersion::SSLv3), None);
    assert_eq!(legacy_wire_version(SslVersion::TLS1), Some(0x0301));
    assert_eq!(legacy_wire_version(SslVersion::TLS1_1), Some(0x0302));
    assert_eq!(legacy_wire_version(SslVersion::SSL3), None);
}

/// Tests only ranges admitting TLS 1.2 or newer are served by rustls.
#[test]
fn legacy_ranges_leave_rustls() {
    assert!(offerable(Some(TlsVersion::Tls10), Some(TlsVersion::Tls10)).is_empty());
    assert!(offerable(Some(TlsVersion::Tls10), Some(TlsVersion::Tls11)).is_empty());
    assert_eq!(offerable(Some(TlsVersion::Tls10), None).len(), 2);
    assert_eq!(offerable(None, Some(TlsVersion::Tls12)).len(), 1);
}

// ============================================================================
// SECTION: Exchanges
// ============================================================================

/// Tests a plain HTTP request sends the request headers and reports no TLS.
#[test]
fn plain_http_request_round_trip() {
    let (base, handle) = raw_http_server(
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nx-ms-request-id: r1\r\n\r\nok",
    );
    let transport = TlsTransport::new(Duration::from_secs(5));

    let request = get_request(format!("{base}/?comp=list"), None, None);
    let response = transport.get(&request).unwrap();
    let head = handle.join().unwrap();

    assert_eq!(response.status, "200 OK");
    assert_eq!(response.headers.get("x-ms-request-id"), Some("r1"));
    assert_eq!(response.tls_version, None);
    assert!(head.starts_with("GET /?comp=list HTTP/1.1\r\n"));
    assert!(head.contains("x-ms-version: 2025-01-05\r\n"));
    assert!(head.contains("Connection: close\r\n"));
}

/// Tests pinned TLS 1.0 and 1.1 requests reach the server offering that version.
#[test]
fn legacy_range_sends_pinned_client_hello() {
    for version in [TlsVersion::Tls10, TlsVersion::Tls11] {
        let (base, handle) = client_hello_server();
        let transport = TlsTransport::new(Duration::from_secs(5));

        let request = get_request(format!("{base}/"), Some(version), Some(version));
        let outcome = transport.get(&request);
        let hello = handle.join().unwrap();

        assert!(matches!(outcome, Err(CloudError::Request(_))));
        assert_eq!(hello[0], 0x16, "handshake record");
        assert_eq!(hello[5], 0x01, "client hello");
        assert_eq!(u16::from_be_bytes([hello[9], hello[10]]), version.wire());
    }
}

/// Tests unsupported schemes are rejected.
#[test]
fn unsupported_scheme_is_rejected() {
    let transport = TlsTransport::new(Duration::from_secs(1));

    let request = get_request("ftp://example.com/".to_string(), None, None);
    let err = transport.get(&request).unwrap_err();

    assert!(matches!(err, CloudError::Request(message) if message.contains("ftp")));
}
