//! Middleware stack for the API server
//!
//! Provides logging, request ID generation, CORS, rate limiting, and timeouts.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use readalong_common::{CorsConfig, RateLimitConfig};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorError, GovernorLayer,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests running longer than this get 503
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply request ID, tracing and timeout layers
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span as fn(&Request<Body>) -> tracing::Span)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header()))
        .layer(SetRequestIdLayer::new(request_id_header(), MakeRequestUuid))
}

/// Apply the full stack: CORS inside, then timeout, tracing, request ID, and rate limiting
/// outermost.
pub fn apply_middleware_with_config(
    router: Router<AppState>,
    rate_limit_config: &RateLimitConfig,
    cors_config: &CorsConfig,
    is_production: bool,
) -> Router<AppState> {
    let router = apply_middleware(router.layer(create_cors_layer(cors_config, is_production)));

    // One token every 1/rps seconds, per caller
    let governor_conf = Duration::from_secs(1)
        .checked_div(rate_limit_config.requests_per_second)
        .and_then(|period| {
            GovernorConfigBuilder::default()
                .period(period)
                .burst_size(rate_limit_config.burst)
                .key_extractor(CallerKeyExtractor)
                .finish()
        });

    match governor_conf {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            warn!(
                requests_per_second = rate_limit_config.requests_per_second,
                burst = rate_limit_config.burst,
                "Invalid rate limit configuration, rate limiting disabled"
            );
            router
        }
    }
}

/// Rate limit bucket key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallerKey {
    Peer(IpAddr),
    /// No connection info on the request (e.g. a router driven in-process)
    Unknown,
}

/// Keys the rate limit by the peer IP address of the connection.
///
/// Needs the app to be served with `into_make_service_with_connect_info::<SocketAddr>()`;
/// requests without connection info share one bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerKeyExtractor;

impl KeyExtractor for CallerKeyExtractor {
    type Key = CallerKey;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or(CallerKey::Unknown, |ConnectInfo(addr)| CallerKey::Peer(addr.ip())))
    }
}

fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

/// Root span for one HTTP request, tagged with its request ID
fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Create CORS layer from configuration
///
/// In development with no configured origins any origin is allowed; otherwise only the
/// configured list.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            request_id_header(),
        ])
        .expose_headers([
            request_id_header(),
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
        ]);

    if !is_production && config.allowed_origins.is_empty() {
        warn!("CORS: Allowing any origin (development mode). Configure CORS_ALLOWED_ORIGINS for production.");
        return base_layer.allow_origin(Any);
    }

    if config.allowed_origins.is_empty() {
        warn!("CORS: No allowed origins configured in production mode. Browser requests will be blocked.");
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    info!(count = origins.len(), "CORS: Allowing configured origins");
    base_layer.allow_origin(AllowOrigin::list(origins))
}
