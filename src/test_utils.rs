// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses, clients, installers and logs.

use crate::error::{ProvisionError, Result};
use crate::installer::{ComponentInstaller, InstallOptions};
use crate::kubernetes::ClientProvider;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::core::ErrorResponse;
use kube::Client;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use tracing_subscriber::fmt::MakeWriter;

/// A request seen by [`MockService`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// A mock HTTP service that returns predefined responses based on request paths
/// and records every request it receives.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen for a method and exact path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// JSON bodies sent for a method and exact path
    pub fn bodies(&self, method: &str, path: &str) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .filter_map(|r| r.body)
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<
            dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>>
                + Send,
        >,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let response = self.find_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            let body = serde_json::from_slice(&bytes).ok();
            requests.lock().unwrap().push(RecordedRequest {
                method,
                path,
                body,
            });

            // Default 404 for unmatched requests
            let (status, body) = response
                .unwrap_or_else(|| (404, status_json("NotFound", 404, "not found")));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
    .to_string()
}

/// Create a failure `Status` body
pub fn status_json(reason: &str, code: u16, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 409 already exists response
pub fn already_exists_json(resource: &str, name: &str) -> String {
    status_json(
        "AlreadyExists",
        409,
        &format!("{} \"{}\" already exists", resource, name),
    )
}

/// Echo a minimal object of the given kind, enough for create calls to decode
pub fn object_json(api_version: &str, kind: &str, name: &str) -> String {
    serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "name": name, "uid": "test-uid" }
    })
    .to_string()
}

/// A kube API error as the client would surface it
pub fn api_error(reason: &str, code: u16) -> ProvisionError {
    ProvisionError::KubeError(kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} ({})", reason, code),
        reason: reason.to_string(),
        code,
    }))
}

/// Hands out clones of a mock client and counts lookups
#[derive(Clone)]
pub struct StaticClientProvider {
    client: Client,
    pub lookups: Arc<AtomicUsize>,
}

impl StaticClientProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ClientProvider for StaticClientProvider {
    fn client_for_context(&self, _context: &str) -> impl Future<Output = Result<Client>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let client = self.client.clone();
        async move { Ok(client) }
    }
}

/// Fails every lookup
pub struct FailingClientProvider;

impl ClientProvider for FailingClientProvider {
    fn client_for_context(&self, context: &str) -> impl Future<Output = Result<Client>> + Send {
        let message = format!("context {:?} does not exist", context);
        async move { Err(ProvisionError::ClientResolution(message)) }
    }
}

/// Scripted result of a fake installer call
#[derive(Clone, Copy, Debug)]
pub enum Scripted {
    Succeed,
    AlreadyExists,
    /// 409 for a reason other than the object already existing
    Conflict,
    Fail,
}

impl Scripted {
    fn into_result(self) -> Result<()> {
        match self {
            Scripted::Succeed => Ok(()),
            Scripted::AlreadyExists => Err(api_error("AlreadyExists", 409)),
            Scripted::Conflict => Err(api_error("Conflict", 409)),
            Scripted::Fail => Err(api_error("InternalError", 500)),
        }
    }
}

/// Installer whose install/upgrade outcomes are fixed up front
pub struct FakeInstaller {
    install: Scripted,
    upgrade: Scripted,
    pub install_calls: AtomicUsize,
    pub upgrade_calls: AtomicUsize,
    pub last_options: Mutex<Option<InstallOptions>>,
}

impl FakeInstaller {
    pub fn new(install: Scripted, upgrade: Scripted) -> Self {
        Self {
            install,
            upgrade,
            install_calls: AtomicUsize::new(0),
            upgrade_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }
}

impl ComponentInstaller for FakeInstaller {
    fn install(
        &self,
        _client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        let result = self.install.into_result();
        async move { result }
    }

    fn upgrade(
        &self,
        _client: &Client,
        options: &InstallOptions,
    ) -> impl Future<Output = Result<()>> + Send {
        self.upgrade_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(options.clone());
        let result = self.upgrade.into_result();
        async move { result }
    }
}

/// Collects formatted tracing output for assertions
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Install a thread-local subscriber writing into this buffer
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    pub fn occurrences(&self, needle: &str) -> usize {
        self.contents().matches(needle).count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
