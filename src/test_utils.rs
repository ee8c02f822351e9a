// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type ResponseFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response<Body>, tower::BoxError>> + Send>>;

/// A request seen by a mock service
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Registering several responses for the same method and path plays them back in
/// order; the last one keeps being returned once the others are used up.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.push("GET", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.push("PUT", path, status, body)
    }

    fn push(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: req.uri().query().map(str::to_string),
        });

        let (status, body) = self
            .next_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("path", &path)));

        Box::pin(async move { Ok(json_response(status, body)) })
    }
}

/// An in-memory store holding a single object that enforces resource versions on PUT.
///
/// GET on the object path returns the stored object. PUT succeeds only when the body
/// carries the stored resource version, which is then incremented; otherwise it answers
/// 409 and leaves the object untouched.
#[derive(Clone)]
pub struct StubStore {
    path: String,
    object: Arc<Mutex<Value>>,
    puts: Arc<AtomicUsize>,
}

impl StubStore {
    pub fn new(namespace: &str, object_json: &str) -> Self {
        let object: Value = serde_json::from_str(object_json).unwrap();
        let name = object["metadata"]["name"].as_str().unwrap().to_string();
        Self {
            path: format!(
                "/apis/fabric.hyperledger.org/v1/namespaces/{}/peerclusters/{}",
                namespace, name
            ),
            object: Arc::new(Mutex::new(object)),
            puts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    pub fn stored(&self) -> Value {
        self.object.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Service<Request<Body>> for StubStore {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        Box::pin(self.clone().handle(req))
    }
}

impl StubStore {
    async fn handle(self, req: Request<Body>) -> Result<Response<Body>, tower::BoxError> {
        let path = req.uri().path().to_string();
        if path != self.path {
            return Ok(json_response(404, not_found_json("path", &path)));
        }

        let method = req.method().clone();
        match method.as_str() {
            "GET" => Ok(json_response(200, self.stored().to_string())),
            "PUT" => {
                self.puts.fetch_add(1, Ordering::SeqCst);
                let bytes = req.into_body().collect().await?.to_bytes();
                let mut submitted: Value = serde_json::from_slice(&bytes)?;

                let mut object = self.object.lock().unwrap();
                let current = object["metadata"]["resourceVersion"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                if submitted["metadata"]["resourceVersion"].as_str() != Some(current.as_str()) {
                    let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
                    return Ok(json_response(409, conflict_json("peerclusters", &name)));
                }

                let next = current.parse::<u64>().unwrap_or(0) + 1;
                submitted["metadata"]["resourceVersion"] = Value::String(next.to_string());
                *object = submitted;
                Ok(json_response(200, object.to_string()))
            }
            _ => Ok(json_response(405, String::new())),
        }
    }
}

fn json_response(status: u16, body: String) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body.into_bytes()))
        .unwrap()
}

/// Create a mock PeerCluster JSON response
pub fn peer_cluster_json(name: &str, resource_version: &str, size: u32) -> String {
    serde_json::json!({
        "apiVersion": "fabric.hyperledger.org/v1",
        "kind": "PeerCluster",
        "metadata": {
            "name": name,
            "namespace": "fabric",
            "resourceVersion": resource_version
        },
        "spec": {
            "size": size
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 conflict response as returned for a stale resource version
pub fn conflict_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!(
            "Operation cannot be fulfilled on {} \"{}\": the object has been modified; please apply your changes to the latest version and try again",
            resource, name
        ),
        "reason": "Conflict",
        "code": 409
    })
    .to_string()
}
