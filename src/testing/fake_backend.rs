use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::AppError;
use crate::ports::{ApiRequest, ApiResponse, Method, SiteBackend};

/// Scripted reply for one route.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Status(u16, Vec<u8>),
    TransportError,
}

type Route = (Method, String);

/// Backend fake that records every request and answers from a script.
///
/// Each route holds a queue of replies; the last one repeats forever.
/// Unscripted routes answer 404.
#[derive(Clone, Default)]
pub struct FakeBackend {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    routes: Arc<Mutex<HashMap<Route, VecDeque<FakeReply>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, method: Method, path: &str, reply: FakeReply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, FakeReply::Status(status, body.as_bytes().to_vec()))
    }

    pub fn reply_json(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, FakeReply::Status(status, body.to_string().into_bytes()))
    }

    pub fn fail(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, FakeReply::TransportError)
    }

    /// Hold replies on `path` for `delay` (tokio time, so pausable).
    pub fn delay(&self, path: &str, delay: Duration) -> &Self {
        self.delays.lock().unwrap().insert(path.to_string(), delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn next_reply(&self, method: Method, path: &str) -> FakeReply {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => FakeReply::Status(404, Vec::new()),
        }
    }
}

#[async_trait]
impl SiteBackend for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let method = request.method;
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        let delay = self.delays.lock().unwrap().get(&path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply(method, &path) {
            FakeReply::Status(status, body) => Ok(ApiResponse::new(status, body)),
            FakeReply::TransportError => Err(AppError::http("connection refused (fake)", None)),
        }
    }
}
