//! An in-memory [`Backend`] with canned replies, for tests.
//!
//! Replies are queued per `(method, path)` and consumed first-in first-out.
//! Every request is recorded, so a test can assert exactly which calls were
//! made, or that none were.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ApiRequest, ApiResponse, Backend, Method, TransportError};

#[derive(Debug)]
enum Reply {
    Respond(ApiResponse),
    Fail(String),
    Timeout,
}

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<(Method, String), VecDeque<Reply>>,
    log: Vec<ApiRequest>,
}

/// A scripted backend. Clones share the same script and request log.
///
/// A request with no queued reply gets a 404 with a backend-style error
/// body, the same thing the real backend answers for an unknown route.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.lock()
            .replies
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Queues a response for the next `method path` request.
    pub fn reply(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
        self.push(method, path, Reply::Respond(response))
    }

    /// Queues a JSON response.
    pub fn reply_json(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        let body: String = body.into();
        self.reply(method, path, ApiResponse::json(status, body.into_bytes()))
    }

    /// Queues a bodiless response.
    pub fn reply_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        self.reply(method, path, ApiResponse::empty(status))
    }

    /// Queues a backend error body: `{"status", "error", "message"}`.
    pub fn reject(&self, method: Method, path: &str, status: u16, message: &str) -> &Self {
        let body = serde_json::json!({
            "status": status,
            "error": "Error",
            "message": message,
        });
        self.reply_json(method, path, status, body.to_string())
    }

    /// Queues a connection failure.
    pub fn fail(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Reply::Fail("connection refused".into()))
    }

    /// Queues a timeout.
    pub fn time_out(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Reply::Timeout)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().log.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().log.len()
    }

    /// How many requests hit `path`, whatever their method.
    pub fn count_to(&self, path: &str) -> usize {
        self.lock().log.iter().filter(|r| r.path == path).count()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.lock().log.last().cloned()
    }
}

impl Backend for ScriptedBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut script = self.lock();
        let key = (request.method, request.path.clone());
        let reply = script.replies.get_mut(&key).and_then(VecDeque::pop_front);
        let unmatched = format!("no scripted reply for {} {}", request.method, request.path);
        script.log.push(request);
        drop(script);

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Fail(reason)) => Err(TransportError::Request(reason)),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            None => {
                tracing::debug!("{unmatched}");
                let body = format!(
                    r#"{{"status":404,"error":"Not Found","message":"{unmatched}"}}"#
                );
                Ok(ApiResponse::json(404, body.into_bytes()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_are_consumed_in_order() {
        let backend = ScriptedBackend::new();
        backend
            .reply_empty(Method::Post, "/auth/logout", 200)
            .fail(Method::Post, "/auth/logout");

        let first = backend.send(ApiRequest::post("/auth/logout")).await;
        let second = backend.send(ApiRequest::post("/auth/logout")).await;

        assert_eq!(first.expect("first reply").status, 200);
        assert!(matches!(second, Err(TransportError::Request(_))));
        assert_eq!(backend.count_to("/auth/logout"), 2);
    }

    #[tokio::test]
    async fn test_unmatched_request_gets_404() {
        let backend = ScriptedBackend::new();

        let response = backend
            .send(ApiRequest::get("/nowhere"))
            .await
            .expect("404 is a response");

        assert_eq!(response.status, 404);
        assert_eq!(backend.request_count(), 1);
    }

    #[tokio::test]
    async fn test_reject_body_is_valid_json_for_any_message() {
        let backend = ScriptedBackend::new();
        let message = "Ruta C:\\tmp inválida\n\"segunda\" línea";
        backend.reject(Method::Post, "/auth/login", 400, message);

        let response = backend.send(ApiRequest::post("/auth/login")).await.expect("response");
        let body: serde_json::Value = serde_json::from_slice(&response.body).expect("valid json");

        assert_eq!(response.status, 400);
        assert_eq!(body["message"], message);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_key() {
        let backend = ScriptedBackend::new();
        backend.reply_empty(Method::Get, "/x", 200);

        let response = backend.send(ApiRequest::post("/x")).await.expect("response");

        assert_eq!(response.status, 404);
    }
}
