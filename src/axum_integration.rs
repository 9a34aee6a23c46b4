//! Axum integration for the route guard
//!
//! Provides a tower layer that evaluates the guard on every request: the
//! request's own path is checked via `check_authorization_for` (and also
//! recorded as the current route), and a denied request is redirected to
//! the configured unauthorized URL instead of reaching its handler.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use routeguard::axum_integration::GuardLayer;
//! use routeguard::RouteGuard;
//!
//! let guard = Arc::new(RouteGuard::new());
//! let app: Router = Router::new()
//!     .route("/admin", get(admin_handler))
//!     .layer(GuardLayer::new(guard));
//! ```

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;
use tower::Layer;
use tower::Service;

use crate::guard::RouteGuard;

/// Middleware layer that runs the route guard on each request
#[derive(Clone)]
pub struct GuardLayer {
    guard: Arc<RouteGuard>,
}

impl GuardLayer {
    pub fn new(guard: Arc<RouteGuard>) -> Self {
        Self { guard }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            guard: self.guard.clone(),
        }
    }
}

#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    guard: Arc<RouteGuard>,
}

impl<S> Service<Request> for GuardMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let inner = self.inner.clone();
        let mut inner = inner;
        let guard = self.guard.clone();

        Box::pin(async move {
            // Requests are concurrent here, so the check must evaluate this
            // request's own path; the stored current route is only kept in
            // sync as the latest observed value.
            guard.set_current_route(request.uri().path());

            match guard.check_authorization_for(request.uri().path()) {
                Ok(true) => inner.call(request).await,
                Ok(false) => {
                    let target = guard.unauthorized_url();
                    Ok(Redirect::to(&target).into_response())
                }
                Err(err) => {
                    // Missing identity wiring is a deployment fault, not a
                    // denial; surface it loudly.
                    tracing::warn!(error = %err, "route guard cannot run");
                    Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
                }
            }
        })
    }
}
