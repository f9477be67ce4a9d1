pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, put},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::config::RentalConfig;
use crate::middleware::{access_guard, require_roles, ANY_ROLE, OWNER_ONLY, TENANT_ONLY};
use crate::services::{
    AuthService, ContractService, IncidentService, JwtService, NotificationService,
    PaymentService, Store, TenantService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::metrics::metrics,
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::create_tenant,
        handlers::auth::dashboard,
        handlers::auth::me,
        handlers::auth::list_tenants,
        handlers::contracts::list_contracts,
        handlers::contracts::create_contract,
        handlers::payments::list_payments,
        handlers::payments::create_payment,
        handlers::payments::update_payment,
        handlers::payments::mark_paid,
        handlers::payments::delete_payment,
        handlers::payments::tenant_payments,
        handlers::payments::tenant_pay,
        handlers::incidents::list_owner_incidents,
        handlers::incidents::update_incident,
        handlers::incidents::list_tenant_incidents,
        handlers::incidents::report_incident,
        handlers::notifications::list_notifications,
        handlers::notifications::send_notification,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::archive,
        handlers::tenant::dashboard,
        handlers::tenant::profile,
        handlers::tenant::update_profile,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::auth::LoginRequest,
            dtos::auth::RegisterRequest,
            dtos::auth::CreateTenantRequest,
            dtos::auth::UserResponse,
            dtos::auth::AuthResponse,
            dtos::auth::MeResponse,
            dtos::auth::TenantResponse,
            dtos::auth::TenantCreatedResponse,
            dtos::auth::TenantListResponse,
            dtos::auth::DashboardResponse,
            dtos::contract::CreateContractRequest,
            dtos::contract::ContractResponse,
            dtos::contract::ContractEnvelope,
            dtos::contract::ContractListResponse,
            dtos::payment::CreatePaymentRequest,
            dtos::payment::UpdatePaymentRequest,
            dtos::payment::MarkPaidRequest,
            dtos::payment::TenantPayRequest,
            dtos::payment::PaymentResponse,
            dtos::payment::PaymentEnvelope,
            dtos::payment::PaymentListResponse,
            dtos::payment::TenantPaymentListResponse,
            dtos::incident::ReportIncidentRequest,
            dtos::incident::UpdateIncidentRequest,
            dtos::incident::IncidentResponse,
            dtos::incident::IncidentEnvelope,
            dtos::incident::IncidentListResponse,
            dtos::notification::SendNotificationRequest,
            dtos::notification::NotificationResponse,
            dtos::notification::NotificationEnvelope,
            dtos::notification::NotificationListResponse,
            dtos::notification::MarkAllReadResponse,
            dtos::tenant::UpdateProfileRequest,
            dtos::tenant::ProfileResponse,
            dtos::tenant::ProfileUpdatedResponse,
            dtos::tenant::TenantDashboardData,
            dtos::tenant::TenantDashboardResponse,
            models::Role,
            models::PaymentStatus,
            models::PaymentMethod,
            models::PaymentStatistics,
            models::IncidentStatus,
            models::Priority,
            models::NotificationType,
            models::NotificationStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration and account data"),
        (name = "Tenants", description = "Owner view of their tenants"),
        (name = "Contracts", description = "Leases between owners and tenants"),
        (name = "Payments", description = "Owner-side payment lifecycle"),
        (name = "Incidents", description = "Owner-side incident handling"),
        (name = "Notifications", description = "Per-user inbox"),
        (name = "Tenant", description = "Tenant self-service"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: RentalConfig,
    pub store: Arc<dyn Store>,
    pub jwt: JwtService,
    pub auth_service: AuthService,
    pub payment_service: PaymentService,
    pub contract_service: ContractService,
    pub incident_service: IncidentService,
    pub notification_service: NotificationService,
    pub tenant_service: TenantService,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

impl AppState {
    /// Wire every service over one shared store.
    pub fn new(config: RentalConfig, store: Arc<dyn Store>) -> Self {
        let jwt = JwtService::new(&config.jwt.secret);
        let notification_service = NotificationService::new(store.clone());

        let limits = &config.rate_limit;
        let login_rate_limiter =
            create_ip_rate_limiter(limits.login_attempts, limits.login_window_seconds);
        let register_rate_limiter =
            create_ip_rate_limiter(limits.register_attempts, limits.register_window_seconds);
        let ip_rate_limiter =
            create_ip_rate_limiter(limits.global_ip_limit, limits.global_ip_window_seconds);

        Self {
            auth_service: AuthService::new(store.clone(), jwt.clone()),
            payment_service: PaymentService::new(store.clone(), notification_service.clone()),
            contract_service: ContractService::new(store.clone(), notification_service.clone()),
            incident_service: IncidentService::new(store.clone(), notification_service.clone()),
            tenant_service: TenantService::new(store.clone()),
            notification_service,
            jwt,
            store,
            login_rate_limiter,
            register_rate_limiter,
            ip_rate_limiter,
            config,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    let login_route = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .layer(from_fn_with_state(
            state.login_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    let register_route = Router::new()
        .route("/auth/registro", post(handlers::auth::register))
        .layer(from_fn_with_state(
            state.register_rate_limiter.clone(),
            ip_rate_limit_middleware,
        ));

    // Role layer first so the guard, added after it, runs before it.
    let owner_routes = Router::new()
        .route("/auth/crear-inquilino", post(handlers::auth::create_tenant))
        .route("/inquilinos", get(handlers::auth::list_tenants))
        .route(
            "/contratos",
            get(handlers::contracts::list_contracts).post(handlers::contracts::create_contract),
        )
        .route(
            "/pagos",
            get(handlers::payments::list_payments).post(handlers::payments::create_payment),
        )
        .route(
            "/pagos/:id",
            put(handlers::payments::update_payment).delete(handlers::payments::delete_payment),
        )
        .route(
            "/pagos/:id/marcar-pagado",
            patch(handlers::payments::mark_paid),
        )
        .route(
            "/incidencias",
            get(handlers::incidents::list_owner_incidents),
        )
        .route(
            "/incidencias/:id",
            patch(handlers::incidents::update_incident),
        )
        .route(
            "/notificaciones",
            post(handlers::notifications::send_notification),
        )
        .route_layer(from_fn_with_state(OWNER_ONLY, require_roles))
        .route_layer(from_fn_with_state(state.clone(), access_guard));

    let shared_routes = Router::new()
        .route("/auth/dashboard", get(handlers::auth::dashboard))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/notificaciones",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/notificaciones/leer-todas",
            patch(handlers::notifications::mark_all_read),
        )
        .route(
            "/notificaciones/:id/leer",
            patch(handlers::notifications::mark_read),
        )
        .route(
            "/notificaciones/:id/archivar",
            patch(handlers::notifications::archive),
        )
        .route_layer(from_fn_with_state(ANY_ROLE, require_roles))
        .route_layer(from_fn_with_state(state.clone(), access_guard));

    let tenant_routes = Router::new()
        .route("/tenant/dashboard", get(handlers::tenant::dashboard))
        .route(
            "/tenant/profile",
            get(handlers::tenant::profile).put(handlers::tenant::update_profile),
        )
        .route("/tenant/payments", get(handlers::payments::tenant_payments))
        .route(
            "/tenant/payments/:id/pay",
            patch(handlers::payments::tenant_pay),
        )
        .route(
            "/tenant/incidents",
            get(handlers::incidents::list_tenant_incidents)
                .post(handlers::incidents::report_incident),
        )
        .route_layer(from_fn_with_state(TENANT_ONLY, require_roles))
        .route_layer(from_fn_with_state(state.clone(), access_guard));

    let ip_limiter = state.ip_rate_limiter.clone();
    let cors = cors_layer(&state.config.security.allowed_origins);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(login_route)
        .merge(register_route)
        .merge(owner_routes)
        .merge(shared_routes)
        .merge(tenant_routes)
        .with_state(state)
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                    user_id = tracing::field::Empty,
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database unreachable", body = ErrorResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up"
        }
    })))
}
