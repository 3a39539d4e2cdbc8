// crates/ccc-objstor-azure/tests/common/mod.rs
// ============================================================================
// Module: Azure Binding Test Helpers
// Description: Canned-response HTTP server and a static token source.
// Purpose: Exercise the REST clients without network access.
// Dependencies: ccc-objstor-azure, tiny_http, base64
// ============================================================================

//! ## Overview
//! Helpers shared by the Azure client integration tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers; not every test binary uses every helper."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ccc_objstor_azure::SharedTokens;
use ccc_objstor_azure::client::build_http_client;
use ccc_objstor_core::AccessToken;
use ccc_objstor_core::CloudError;
use ccc_objstor_core::ResourceId;
use ccc_objstor_core::TokenSource;
use reqwest::blocking::Client;
use time::OffsetDateTime;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

/// Caller object id embedded in [`jwt_with_oid`] tokens.
pub const CALLER_OID: &str = "11111111-2222-3333-4444-555555555555";

/// Canned response served for one request.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Canned {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn xml(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/xml".to_string())],
            body: body.to_string(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Request observed by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Local server answering requests with `responses` in order.
pub struct CannedServer {
    pub base: String,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CannedServer {
    pub fn start(responses: Vec<Canned>) -> Self {
        Self::start_with(move |_| responses)
    }

    /// Starts a server whose responses may embed its own base URL.
    pub fn start_with(build: impl FnOnce(&str) -> Vec<Canned>) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let base = format!("http://{addr}");
        let responses = build(&base);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for canned in responses {
                let Ok(Some(mut request)) = server.recv_timeout(Duration::from_secs(5)) else {
                    return;
                };
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                recorded.lock().unwrap().push(Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|h| (h.field.as_str().to_string(), h.value.as_str().to_string()))
                        .collect(),
                    body,
                });
                let mut response =
                    Response::from_string(canned.body).with_status_code(canned.status);
                for (name, value) in canned.headers {
                    response = response.with_header(
                        Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap(),
                    );
                }
                let _ = request.respond(response);
            }
        });
        Self {
            base,
            requests,
            handle: Some(handle),
        }
    }

    /// Waits for the server to answer every canned response and returns the log.
    pub fn finish(mut self) -> Vec<Recorded> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.requests.lock().unwrap().clone()
    }
}

/// Token source returning one fixed token and recording requested scopes.
pub struct StaticTokens {
    pub token: String,
    pub scopes: Mutex<Vec<String>>,
}

impl StaticTokens {
    pub fn shared(token: &str) -> (Arc<Self>, SharedTokens) {
        let tokens = Arc::new(Self {
            token: token.to_string(),
            scopes: Mutex::new(Vec::new()),
        });
        let shared: SharedTokens = tokens.clone();
        (tokens, shared)
    }
}

impl TokenSource for StaticTokens {
    fn token(&self, scope: &str) -> Result<AccessToken, CloudError> {
        self.scopes.lock().unwrap().push(scope.to_string());
        Ok(AccessToken {
            token: self.token.clone(),
            expires_on: OffsetDateTime::now_utc() + time::Duration::hours(1),
        })
    }
}

/// Builds an unsigned JWT whose payload carries [`CALLER_OID`].
pub fn jwt_with_oid() -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"oid":"{CALLER_OID}"}}"#));
    format!("{header}.{payload}.signature")
}

pub fn http() -> Client {
    build_http_client(Duration::from_secs(5)).unwrap()
}

pub fn account() -> ResourceId {
    ResourceId::parse(concat!(
        "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg",
        "/providers/Microsoft.Storage/storageAccounts/acct"
    ))
    .unwrap()
}
