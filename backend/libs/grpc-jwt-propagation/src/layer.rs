//! Tower Layer integration for the access gate
//!
//! tonic interceptors never see the method path, and the gate needs it to
//! recognise the exempt login call. The gate therefore wraps the router as a
//! tower service over raw HTTP requests: every call reaching any service
//! mounted on the server passes through [`AccessGateService::call`].

use crate::claims::AuthenticatedContext;
use crate::server::{AccessGate, GateDecision};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use tonic::body::BoxBody;
use tower::{Layer, Service};
use tracing::{debug, info, warn};

/// Layer that puts an [`AccessGate`] in front of a service
#[derive(Debug, Clone)]
pub struct AccessGateLayer {
    gate: Arc<AccessGate>,
}

impl AccessGateLayer {
    pub fn new(gate: AccessGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl<S> Layer<S> for AccessGateLayer {
    type Service = AccessGateService<S>;

    fn layer(&self, service: S) -> Self::Service {
        AccessGateService {
            inner: service,
            gate: self.gate.clone(),
        }
    }
}

/// Service produced by [`AccessGateLayer`]
#[derive(Debug, Clone)]
pub struct AccessGateService<S> {
    inner: S,
    gate: Arc<AccessGate>,
}

impl<S, ReqBody> Service<http::Request<ReqBody>> for AccessGateService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<BoxBody>>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        let started = Instant::now();
        let method = req.uri().path().to_owned();

        match self.gate.check(&method, Some(req.headers())) {
            Ok(GateDecision::Exempt) => {
                debug!(
                    method = %method,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "exempt method, forwarding without token"
                );
            }
            Ok(GateDecision::Authenticated(identity)) => {
                info!(
                    method = %method,
                    subject = %identity.subject(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "call authorized"
                );
                req.extensions_mut().insert::<AuthenticatedContext>(identity);
            }
            Err(err) => {
                warn!(
                    method = %method,
                    error = %err,
                    code = ?err.code(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "call rejected"
                );
                let response = err.to_status().into_http();
                return Box::pin(async move { Ok(response) });
            }
        }

        // The clone is not guaranteed ready; swap so the polled instance serves this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move { inner.call(req).await })
    }
}
