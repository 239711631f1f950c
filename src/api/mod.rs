use crate::config::Config;
use crate::core::health_service::HealthService;
use crate::core::user_service::UserService;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::{Router, routing::get};
use tower_http::normalize_path::NormalizePath;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod extract;
pub mod health;
pub mod middleware;
pub mod schemas;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct AppState {
    pub user_service: UserService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub user_service: UserService,
}

/// Configures and returns the primary application router: the users API under `/api/users`
/// and the dashboard plus static assets everywhere else.
pub fn app_router(config: &Config, services: ServiceContainer) -> Router {
    let state = AppState { user_service: services.user_service };

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", get(users::get_user).put(users::update_user).delete(users::delete_user))
        .fallback(users::not_found)
        .method_not_allowed_fallback(users::not_found);

    let static_dir = &config.server.static_dir;

    Router::new()
        .nest("/api/users", user_routes)
        .route_service("/", ServeFile::new(static_dir.join("dashboard.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), middleware::MakeRequestUuidOrHeader))
        .with_state(state)
}

/// The application router behind trailing-slash normalization, so `/api/users/` routes like
/// `/api/users`. Normalization has to run before routing, which a `Router::layer` cannot do.
pub fn app_service(config: &Config, services: ServiceContainer) -> NormalizePath<Router> {
    NormalizePath::trim_trailing_slash(app_router(config, services))
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
