//! Shared helpers for integration tests: fixtures and a mock HTTP site.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

/// Mock site for blocking clients; unmounted paths answer 404.
///
/// The runtime only drives setup, requests are made from the test thread.
pub struct Site {
    server: MockServer,
    runtime: Runtime,
}

impl Site {
    pub fn start() -> Self {
        let runtime = Runtime::new().expect("tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Answer GET requests for `route` with `template`
    pub fn mount(&self, route: &str, template: ResponseTemplate) -> &Self {
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(template)
                .mount(&self.server),
        );
        self
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.server.uri(), route)
    }

    pub fn address(&self) -> &SocketAddr {
        self.server.address()
    }
}

/// 200 response carrying an HTML body
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

/// URL on a local port nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
