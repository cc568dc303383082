use std::{
    any::Any,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_api::{ApiError, Envelope, GENERIC_FAILURE};
use platform_authn::AccountService;
use platform_db::DbPool;
use products_hr::EmployeeStore;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::AppConfig,
    routes::{
        auth::{self, CurrentUser},
        employees,
    },
};

/// Multipart bodies carry a 5 MiB image plus text fields.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub employees: EmployeeStore,
    pub accounts: AccountService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let pool = Arc::new(pool);
        Self {
            employees: EmployeeStore::new(pool.clone()),
            accounts: AccountService::new(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "employee server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");

    let employee_routes = Router::new()
        .route(
            "/api/employees",
            get(employees::list).post(employees::create),
        )
        .route("/api/employees/search", get(employees::search))
        .route("/api/employees/stats", get(employees::stats))
        .route(
            "/api/employees/{id}",
            get(employees::get)
                .put(employees::update)
                .delete(employees::delete),
        )
        .route_layer(middleware::from_extractor_with_state::<CurrentUser, _>(
            state.clone(),
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .merge(employee_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = platform_db::ping(&state.pool).await;
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn not_found_handler() -> ApiError {
    ApiError::not_found("Route not found")
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure(GENERIC_FAILURE)),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };

    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use platform_authn::AuthConfig;
    use platform_db::DatabaseSettings;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn test_router(upload_dir: &std::path::Path) -> Router {
        let pool = platform_db::connect(&DatabaseSettings::with_url("sqlite::memory:"))
            .await
            .unwrap();
        let config = AppConfig {
            auth: AuthConfig::new(vec![3u8; 32], 60),
            cors_allowed_origins: vec!["http://localhost:5173".into()],
            upload_dir: upload_dir.to_path_buf(),
        };
        build_router(AppState::new(pool, config))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_database_reachability() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["dbOk"], json!(true));
    }

    #[tokio::test]
    async fn unknown_routes_get_an_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .await
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "message": "Route not found"})
        );
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .await
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/employees")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn uploaded_files_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), b"png bytes").unwrap();
        let response = test_router(dir.path())
            .await
            .oneshot(
                Request::get("/uploads/pic.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"png bytes");
    }
}
