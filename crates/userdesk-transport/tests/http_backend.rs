//! Integration tests for the HTTP backend.
//!
//! These tests spin up a real HTTP server (axum, bound to a random local
//! port) and drive `HttpBackend` against it, so cookies, query strings,
//! headers and timeouts go through a real network stack.

#[cfg(feature = "http")]
mod http {
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::Router;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use userdesk_transport::{ApiRequest, Backend, HttpBackend, HttpConfig, TransportError};

    fn has_session_cookie(headers: &HeaderMap) -> bool {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("SESSION=abc"))
    }

    async fn login() -> impl IntoResponse {
        (
            [
                (header::SET_COOKIE, "SESSION=abc; Path=/; HttpOnly"),
                (header::CONTENT_TYPE, "application/json"),
            ],
            r#"{"requires2fa":false,"message":"ok"}"#,
        )
    }

    async fn user_data(headers: HeaderMap) -> impl IntoResponse {
        if has_session_cookie(&headers) {
            (StatusCode::OK, r#"{"id":1}"#)
        } else {
            (
                StatusCode::UNAUTHORIZED,
                r#"{"status":401,"error":"Unauthorized","message":"No autenticado"}"#,
            )
        }
    }

    async fn forgot_password(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let email = params.get("email").cloned().unwrap_or_default();
        let cookie = if has_session_cookie(&headers) { "with-cookie" } else { "no-cookie" };
        format!("{email}|{cookie}")
    }

    async fn export() -> impl IntoResponse {
        (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"Lista_Usuarios.pdf\""),
            ],
            vec![0x25u8, 0x50, 0x44, 0x46],
        )
    }

    async fn slow() -> impl IntoResponse {
        tokio::time::sleep(Duration::from_secs(2)).await;
        "late"
    }

    /// Starts the test server and returns its address.
    async fn spawn_server() -> SocketAddr {
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/api/v1/users/session/user-data", get(user_data))
            .route("/auth/forgot-password", post(forgot_password))
            .route("/api/v1/users/export/pdf", get(export))
            .route("/slow", get(slow));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        addr
    }

    fn backend_for(addr: SocketAddr) -> HttpBackend {
        HttpBackend::new(HttpConfig {
            base_url: format!("http://{addr}/"),
            request_timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
        })
        .expect("should build")
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent_after_login() {
        let addr = spawn_server().await;
        let backend = backend_for(addr);

        let before = backend
            .send(ApiRequest::get("/api/v1/users/session/user-data"))
            .await
            .expect("response");
        assert_eq!(before.status, 401);

        let login = backend
            .send(ApiRequest::post("/auth/login").json_body(b"{}".to_vec()))
            .await
            .expect("response");
        assert!(login.is_success());

        let after = backend
            .send(ApiRequest::get("/api/v1/users/session/user-data"))
            .await
            .expect("response");
        assert_eq!(after.status, 200);
        assert_eq!(after.body, br#"{"id":1}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_a_response_not_an_error() {
        let addr = spawn_server().await;
        let backend = backend_for(addr);

        let response = backend
            .send(ApiRequest::get("/api/v1/users/session/user-data"))
            .await
            .expect("4xx is still Ok");

        let body: serde_json::Value =
            serde_json::from_slice(&response.body).expect("json error body");
        assert_eq!(response.status, 401);
        assert_eq!(body["message"], "No autenticado");
    }

    #[tokio::test]
    async fn test_omitted_credentials_never_send_the_cookie() {
        let addr = spawn_server().await;
        let backend = backend_for(addr);
        backend
            .send(ApiRequest::post("/auth/login"))
            .await
            .expect("login");

        let response = backend
            .send(
                ApiRequest::post("/auth/forgot-password")
                    .query("email", "a+b@c.com")
                    .without_credentials(),
            )
            .await
            .expect("response");

        assert_eq!(String::from_utf8_lossy(&response.body), "a+b@c.com|no-cookie");
    }

    #[tokio::test]
    async fn test_download_exposes_content_disposition() {
        let addr = spawn_server().await;
        let backend = backend_for(addr);

        let response = backend
            .send(ApiRequest::get("/api/v1/users/export/pdf").query("t", 1))
            .await
            .expect("response");

        assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(
            response.attachment_filename().as_deref(),
            Some("Lista_Usuarios.pdf")
        );
        assert_eq!(response.body, b"%PDF");
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let addr = spawn_server().await;
        let backend = backend_for(addr);

        let result = backend.send(ApiRequest::get("/slow")).await;

        assert!(matches!(result, Err(TransportError::Timeout)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_request_error() {
        // Bind and drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let backend = backend_for(addr);

        let result = backend.send(ApiRequest::get("/")).await;

        assert!(matches!(
            result,
            Err(TransportError::Request(_) | TransportError::Timeout)
        ));
    }
}
