use axum::extract::Request;
use axum::response::Response;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::infrastructure::logging::TraceContext;

/// Per-request trace id, available to handlers as `Extension<TraceId>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// Tags every request with a trace id (caller's `x-trace-id` or a fresh one)
/// and echoes it on the response.
#[derive(Clone, Default)]
pub struct TraceIdLayer;

impl<S> Layer<S> for TraceIdLayer {
    type Service = TraceIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceIdService { inner }
    }
}

#[derive(Clone)]
pub struct TraceIdService<S> {
    inner: S,
}

impl<S> Service<Request> for TraceIdService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // Take the instance that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let trace_id = TraceContext::extract_or_generate(req.headers());
            req.extensions_mut().insert(TraceId(trace_id.clone()));

            let mut response = inner.call(req).await?;
            TraceContext::add_to_headers(response.headers_mut(), &trace_id);

            Ok(response)
        })
    }
}
