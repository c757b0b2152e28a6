//! Access Control Middleware.
//! Restricts anonymous callers to the configured allow-lists.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::access::decision::{is_api_request, on_dispatch};
use crate::access::{DispatchContext, ParamSet, RequestContext};
use crate::http::auth::Authenticator;
use crate::http::request::RequestIdExt;
use crate::http::response::rejection;
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn access_control_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // A request re-entering the router carries its root's dispatch context.
    let dispatch = match req.extensions().get::<DispatchContext>() {
        Some(ctx) => ctx.clone(),
        None => {
            let ctx = DispatchContext::new();
            req.extensions_mut().insert(ctx.clone());
            ctx
        }
    };

    let snapshot = state.snapshot.load_full();

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    snapshot
        .authenticator
        .strip_untrusted(peer, req.headers_mut());

    let verdict = on_dispatch(&dispatch, &snapshot.rules, || {
        request_context(&req, snapshot.authenticator.as_ref())
    });

    let Some(verdict) = verdict else {
        return next.run(req).await;
    };
    metrics::record_decision(&verdict);

    match rejection(&verdict) {
        Some(response) => {
            tracing::info!(
                request_id = %req.request_id(),
                path = %req.uri().path(),
                status = %response.status(),
                "Rejected anonymous request"
            );
            response
        }
        None => next.run(req).await,
    }
}

/// Collect what the access decision needs from a request.
pub fn request_context(req: &Request<Body>, authenticator: &dyn Authenticator) -> RequestContext {
    let params = ParamSet::from_query(req.uri().query().unwrap_or_default());
    let referrer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    RequestContext {
        root_is_api: is_api_request(&params),
        anonymous: authenticator.is_anonymous(req.headers()),
        params,
        referrer,
    }
}
