//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the access gate and forwarding handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Swap the access snapshot when configuration changes
//! - Forward allowed requests to the upstream platform

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderName, uri::{Authority, PathAndQuery, Scheme}, Request, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use arc_swap::ArcSwap;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::access::AccessRules;
use crate::config::validation::{platform_host, trusted_proxies, ValidationError};
use crate::config::GateConfig;
use crate::http::auth::{Authenticator, HeaderAuthenticator};
use crate::http::middleware::access_control_middleware;
use crate::http::request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
use crate::observability::metrics;

/// Everything a request needs from the current configuration.
#[derive(Debug)]
pub struct GateSnapshot {
    pub rules: AccessRules,
    pub authenticator: Arc<dyn Authenticator>,
    pub upstream: Authority,
}

impl GateSnapshot {
    pub fn from_config(config: &GateConfig) -> Result<Self, ValidationError> {
        let host = platform_host(&config.platform)?;
        let header = HeaderName::from_bytes(config.auth.identity_header.as_bytes())
            .map_err(|_| ValidationError::IdentityHeader(config.auth.identity_header.clone()))?;
        let upstream = Authority::from_str(&config.upstream.address).map_err(|_| {
            ValidationError::Address {
                field: "upstream.address",
                value: config.upstream.address.clone(),
            }
        })?;
        let trusted = trusted_proxies(&config.auth)?;

        Ok(Self {
            rules: AccessRules::from_config(&config.access, &host),
            authenticator: Arc::new(HeaderAuthenticator::new(header, trusted)),
            upstream,
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<ArcSwap<GateSnapshot>>,
    pub client: Client<HttpConnector, Body>,
}

impl AppState {
    pub fn new(snapshot: GateSnapshot) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            snapshot: Arc::new(ArcSwap::from_pointee(snapshot)),
            client,
        }
    }

    /// Replace the snapshot with one built from `config`. On error the
    /// current snapshot stays in place.
    pub fn apply(&self, config: &GateConfig) -> Result<(), ValidationError> {
        let snapshot = GateSnapshot::from_config(config)?;
        tracing::info!(
            allowed_requests = snapshot.rules.allowed_requests.len(),
            allowed_referrers = snapshot.rules.allowed_referrers.len(),
            redirect = snapshot.rules.redirect_unallowed_to.is_some(),
            "Access rules loaded"
        );
        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }
}

/// HTTP server for the access gate.
pub struct HttpServer {
    router: Router,
    state: AppState,
    config: GateConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Result<Self, ValidationError> {
        let state = AppState::new(GateSnapshot::from_config(&config)?);
        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            state,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &GateConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                access_control_middleware,
            ))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %req.request_id(),
                    method = %req.method(),
                    path = %req.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configuration updates received on `config_updates` replace the
    /// access snapshot; the server stops when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        let state = self.state.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if let Err(e) = state.apply(&config) {
                    tracing::error!(error = %e, "Rejected configuration update");
                }
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward an allowed request to the upstream platform.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let upstream = state.snapshot.load().upstream.clone();

    let (mut parts, body) = request.into_parts();
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    tracing::debug!(request_id = %request_id, upstream = %upstream, uri = %parts.uri, "Forwarding request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16(), start);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16(), start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
