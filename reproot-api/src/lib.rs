pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use reproot_core::middleware::{
    request_id::request_id_middleware, security_headers::security_headers_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::PortalConfig;
use crate::services::{ApprovalService, AuthService, JwtService, Mailer};
use crate::store::PortalStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub store: Arc<dyn PortalStore>,
    pub jwt: JwtService,
    pub auth: AuthService,
    pub approval: ApprovalService,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: PortalConfig,
        store: Arc<dyn PortalStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt);
        let auth = AuthService::new(
            Arc::clone(&store),
            Arc::clone(&mailer),
            jwt.clone(),
            config.jwt.otp_expiry_minutes,
            config.security.frontend_url.clone(),
        );
        let approval = ApprovalService::new(Arc::clone(&store));

        Self {
            config: Arc::new(config),
            store,
            jwt,
            auth,
            approval,
            http: reqwest::Client::new(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/student/register", post(handlers::auth::register_student))
        .route(
            "/institution/register",
            post(handlers::auth::register_institution),
        )
        .route(
            "/employer/register",
            post(handlers::auth::register_employer),
        )
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/verify-otp/:email", post(handlers::auth::verify_otp))
        .route(
            "/change-password/:email",
            post(handlers::auth::change_password),
        )
        .route("/google", get(handlers::oauth::google_redirect))
        .route("/google/callback", get(handlers::oauth::google_callback))
        .merge(
            Router::new()
                .route("/verify", post(handlers::auth::verify_email))
                .route("/user-auth", get(handlers::auth::user_auth))
                .layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .merge(
            Router::new()
                .route("/admin-auth", get(handlers::auth::admin_auth))
                .layer(from_fn_with_state(
                    state.clone(),
                    middleware::require_super_admin,
                ))
                .layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        );

    let super_admin_routes = Router::new()
        .route("/get-users", get(handlers::users::get_users))
        .route(
            "/get-institution-admins",
            get(handlers::users::get_institution_admins),
        )
        .route("/get-employers", get(handlers::users::get_employers))
        .route(
            "/instAdmin-status/:id",
            put(handlers::users::set_institution_admin_status),
        )
        .route(
            "/employee-status/:id",
            put(handlers::users::set_employer_status),
        )
        .route("/delete-user/:uid", delete(handlers::users::delete_user))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_super_admin,
        ))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let institution_admin_routes = Router::new()
        .route(
            "/student/approve-student",
            post(handlers::users::approve_student),
        )
        .route("/student/my-students", get(handlers::users::my_students))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_institution_admin,
        ))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let employer_detail_routes = Router::new()
        .route(
            "/employer-details/:id",
            put(handlers::users::upsert_company_profile)
                .get(handlers::users::get_company_profile),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_employer,
        ))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let user_routes = Router::new()
        .route("/get-user/:id", get(handlers::users::get_user))
        .merge(
            Router::new()
                .route("/update-user/:id", put(handlers::users::update_user))
                .layer(from_fn_with_state(state.clone(), middleware::require_auth)),
        )
        .merge(super_admin_routes)
        .merge(institution_admin_routes)
        .merge(employer_detail_routes);

    let employer_job_routes = Router::new()
        .route(
            "/create-job-post/:id",
            post(handlers::jobs::create_job_post),
        )
        .route(
            "/applied-candidates/:job_id",
            get(handlers::jobs::applied_candidates),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::require_employer,
        ));

    let job_routes = Router::new()
        .route("/get-job/:id", get(handlers::jobs::get_employer_job_posts))
        .route("/get-jobs", get(handlers::jobs::get_all_job_posts))
        .route("/apply", post(handlers::jobs::apply))
        .merge(employer_job_routes)
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    let allowed_origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(origin = %o, error = %e, "Invalid CORS origin, skipping");
                None
            }
        })
        .collect();

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/jobs", job_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(reproot_core::middleware::request_id::REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}
