use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use platform_api::{ApiError, ApiResult, internal_error};
use platform_db::DbPool;
use products_hr::{Employee, EmployeeId, EmployeeService, HrError, SeaOrmEmployeeGateway};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

const DELETED_MESSAGE: &str = "Employee deleted successfully!";

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub employees: EmployeeService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Arc<AppConfig>) -> Self {
        let gateway = SeaOrmEmployeeGateway::new(pool.clone());
        Self {
            employees: EmployeeService::new(Arc::new(gateway)),
            pool,
            config,
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

    info!(%config.addr, "hr server listening");
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
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/employees",
            get(list_employees).post(create_employee),
        )
        .route(
            "/api/v1/employees/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// Request body for create and update. A client-supplied `id` is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmployeePayload {
    first_name: String,
    last_name: String,
    email: String,
}

impl From<EmployeePayload> for Employee {
    fn from(payload: EmployeePayload) -> Self {
        Employee::new(payload.first_name, payload.last_name, payload.email)
    }
}

/// `Json` extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct JsonBody<T>(T);

/// `Path` extractor whose rejections render as [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
struct PathParam<T>(T);

fn hr_error(err: HrError) -> ApiError {
    match err {
        HrError::AlreadyExists { .. } => ApiError::conflict(err.to_string()),
        HrError::Storage(err) => internal_error(err),
    }
}

fn employee_not_found(id: EmployeeId) -> ApiError {
    ApiError::not_found(format!("employee {id} not found"))
}

async fn create_employee(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<EmployeePayload>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let saved = state
        .employees
        .save_employee(payload.into())
        .await
        .map_err(hr_error)?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let employees = state
        .employees
        .get_all_employees()
        .await
        .map_err(hr_error)?;
    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    PathParam(id): PathParam<EmployeeId>,
) -> ApiResult<Json<Employee>> {
    state
        .employees
        .get_employee_by_id(id)
        .await
        .map_err(hr_error)?
        .map(Json)
        .ok_or_else(|| employee_not_found(id))
}

async fn update_employee(
    State(state): State<AppState>,
    PathParam(id): PathParam<EmployeeId>,
    JsonBody(payload): JsonBody<EmployeePayload>,
) -> ApiResult<Json<Employee>> {
    // Existence is checked here so a missing id answers 404 before anything else.
    if state
        .employees
        .get_employee_by_id(id)
        .await
        .map_err(hr_error)?
        .is_none()
    {
        return Err(employee_not_found(id));
    }
    let updated = state
        .employees
        .update_employee(id, payload.into())
        .await
        .map_err(hr_error)?;
    Ok(Json(updated))
}

async fn delete_employee(
    State(state): State<AppState>,
    PathParam(id): PathParam<EmployeeId>,
) -> ApiResult<(StatusCode, &'static str)> {
    state
        .employees
        .delete_employee(id)
        .await
        .map_err(hr_error)?;
    Ok((StatusCode::OK, DELETED_MESSAGE))
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
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
