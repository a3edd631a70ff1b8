//! Integration Tests for the Access Gate
//!
//! These tests drive the complete flow:
//! Client -> bearer injection -> AccessGateLayer -> downstream handler

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use crypto_core::{Claims, TokenCodec};
use grpc_jwt_propagation::{AccessGate, AccessGateLayer, AuthenticatedContext, BearerInterceptor};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::service::Interceptor;
use tonic::{Code, Request, Status};
use tower::{Layer, Service, ServiceExt};

const SECRET: &str = "s3cr3t";
const REQUIRED_ROLE: &str = "user";
const LOGIN_METHOD: &str = "/pb.AuthService/Login";
const PROTECTED_METHOD: &str = "/pb.TodoService/GetAllTodos";

/// Downstream handler that records what it saw
#[derive(Clone, Default)]
struct Downstream {
    calls: Arc<AtomicUsize>,
    subjects: Arc<Mutex<Vec<Option<String>>>>,
}

impl Downstream {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_subject(&self) -> Option<String> {
        self.subjects.lock().unwrap().last().cloned().flatten()
    }
}

impl Service<http::Request<()>> for Downstream {
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<()>) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let subject = req
            .extensions()
            .get::<AuthenticatedContext>()
            .map(|ctx| ctx.subject().to_string());
        self.subjects.lock().unwrap().push(subject);

        Box::pin(async move { Ok(http::Response::new(tonic::body::empty_body())) })
    }
}

fn codec() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(SECRET).expect("Failed to build codec"))
}

fn layer() -> AccessGateLayer {
    AccessGateLayer::new(AccessGate::new(codec(), REQUIRED_ROLE, LOGIN_METHOD))
}

fn issue(subject: &str, role: &str) -> String {
    let claims = Claims::expires_in(subject, role, Duration::hours(24)).unwrap();
    codec().issue(&claims).expect("Failed to issue token")
}

/// Build an HTTP/2 gRPC request the way tonic hands it to the router
fn grpc_request(method: &str, authorization: Option<&str>) -> http::Request<()> {
    let mut builder = http::Request::builder()
        .method("POST")
        .uri(format!("http://localhost{method}"))
        .header("content-type", "application/grpc");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(()).unwrap()
}

async fn send(downstream: &Downstream, request: http::Request<()>) -> Option<Status> {
    let service = layer().layer(downstream.clone());
    let response = service.oneshot(request).await.unwrap();
    Status::from_header_map(response.headers())
}

// ============================================================================
// Rejection matrix (secret "s3cr3t", required role "user")
// ============================================================================

#[tokio::test]
async fn test_protected_call_without_authorization_is_unauthenticated() {
    let downstream = Downstream::default();

    let status = send(&downstream, grpc_request(PROTECTED_METHOD, None))
        .await
        .expect("rejection carries a status");

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "missing authorization header");
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_admin_role_is_permission_denied() {
    let downstream = Downstream::default();
    let token = issue("u1", "admin");

    let status = send(
        &downstream,
        grpc_request(PROTECTED_METHOD, Some(&format!("Bearer {token}"))),
    )
    .await
    .expect("rejection carries a status");

    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(status.message(), "permission denied");
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_user_role_is_forwarded_once_with_subject() {
    let downstream = Downstream::default();
    let token = issue("u1", "user");

    let status = send(
        &downstream,
        grpc_request(PROTECTED_METHOD, Some(&format!("Bearer {token}"))),
    )
    .await;

    assert!(status.is_none(), "forwarded calls are answered by the handler");
    assert_eq!(downstream.calls(), 1);
    assert_eq!(downstream.last_subject().as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_invalid_token_is_unauthenticated() {
    let downstream = Downstream::default();

    let status = send(
        &downstream,
        grpc_request(PROTECTED_METHOD, Some("Bearer invalid.jwt.token")),
    )
    .await
    .unwrap();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid token");
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_expired_token_is_unauthenticated() {
    let downstream = Downstream::default();
    let claims = Claims::new("u1", "user", Utc::now() - Duration::seconds(30)).unwrap();
    let token = codec().issue(&claims).unwrap();

    let status = send(&downstream, grpc_request(PROTECTED_METHOD, Some(&token)))
        .await
        .unwrap();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_missing_role_claim_is_permission_denied() {
    let downstream = Downstream::default();
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &serde_json::json!({ "sub": "u1", "exp": exp }),
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let status = send(&downstream, grpc_request(PROTECTED_METHOD, Some(&token)))
        .await
        .unwrap();

    assert_eq!(status.code(), Code::PermissionDenied);
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_non_string_subject_is_invalid_claims() {
    let downstream = Downstream::default();
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &serde_json::json!({ "sub": 7, "role": "user", "exp": exp }),
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let status = send(&downstream, grpc_request(PROTECTED_METHOD, Some(&token)))
        .await
        .unwrap();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid claims");
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_empty_subject_is_invalid_claims() {
    let downstream = Downstream::default();
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &serde_json::json!({ "sub": "", "role": "user", "exp": exp }),
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let status = send(
        &downstream,
        grpc_request(PROTECTED_METHOD, Some(&format!("Bearer {token}"))),
    )
    .await
    .unwrap();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid claims");
    assert_eq!(downstream.calls(), 0);
}

#[tokio::test]
async fn test_unsigned_none_algorithm_token_is_invalid() {
    let downstream = Downstream::default();
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "sub": "u1", "role": "user", "exp": exp }).to_string(),
    );
    let unsigned = format!("{header}.{payload}.");

    let status = send(
        &downstream,
        grpc_request(PROTECTED_METHOD, Some(&format!("Bearer {unsigned}"))),
    )
    .await
    .unwrap();

    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid token");
    assert_eq!(downstream.calls(), 0);
}

// ============================================================================
// Exempt login method
// ============================================================================

#[tokio::test]
async fn test_login_is_forwarded_without_authorization() {
    let downstream = Downstream::default();

    let status = send(&downstream, grpc_request(LOGIN_METHOD, None)).await;

    assert!(status.is_none());
    assert_eq!(downstream.calls(), 1);
    assert_eq!(downstream.last_subject(), None);
}

#[tokio::test]
async fn test_login_is_forwarded_with_garbage_authorization() {
    let downstream = Downstream::default();

    let status = send(
        &downstream,
        grpc_request(LOGIN_METHOD, Some("Bearer definitely-not-a-token")),
    )
    .await;

    assert!(status.is_none());
    assert_eq!(downstream.calls(), 1);
    assert_eq!(downstream.last_subject(), None, "exempt calls carry no identity");
}

// ============================================================================
// Client interceptor round trip
// ============================================================================

#[tokio::test]
async fn test_client_interceptor_headers_pass_the_gate() {
    let downstream = Downstream::default();
    let mut interceptor = BearerInterceptor::new(issue("u42", "user")).unwrap();

    let request = interceptor.call(Request::new(())).unwrap();
    let headers = request.metadata().clone().into_headers();

    let mut http_request = grpc_request(PROTECTED_METHOD, None);
    http_request.headers_mut().extend(headers);

    assert!(send(&downstream, http_request).await.is_none());
    assert_eq!(downstream.last_subject().as_deref(), Some("u42"));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let downstream = Downstream::default();
    let service = layer().layer(downstream.clone());

    let mut handles = Vec::new();
    for i in 0..16 {
        let role = if i % 2 == 0 { "user" } else { "admin" };
        let token = issue(&format!("u{i}"), role);
        let svc = service.clone();
        handles.push(tokio::spawn(async move {
            let response = svc
                .oneshot(grpc_request(PROTECTED_METHOD, Some(&format!("Bearer {token}"))))
                .await
                .unwrap();
            Status::from_header_map(response.headers()).map(|s| s.code())
        }));
    }

    let mut denied = 0;
    for handle in handles {
        if handle.await.unwrap() == Some(Code::PermissionDenied) {
            denied += 1;
        }
    }

    assert_eq!(denied, 8);
    assert_eq!(downstream.calls(), 8);
}
