//! Coverwise HTTP API
//!
//! HTTP layer for Coverwise, built with Axum.
//!
//! # Endpoints
//!
//! ## Quotes
//! - `POST /api/quotes` - Store a wizard submission and notify the agency
//! - `POST /api/send-email` - Send the quote notification email
//!
//! ## Content
//! - `GET /api/blog/categories` - All blog categories with icon and image
//! - `GET /api/blog/categories/:label` - One category, unknown labels map to General
//! - `GET /api/site` - Public analytics and scheduling identifiers
//!
//! ## Auth
//! - `POST /auth/login` - Email/password sign in
//! - `POST /auth/logout` - Sign out
//!
//! ## Pages
//! - `GET /login`, `GET /signup`, `GET /admin/login`
//! - `GET /dashboard` - Agent dashboard (signed in)
//! - `GET /admin` - Admin overview (admin role)
//! - `GET /admin/quotes/export` - CSV export (admin role)
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check (data store reachable)
//! - `GET /health` - Full health status
//!
//! Every request passes the routing guard first. Admin pages additionally
//! check the role on each render.
//!
//! # Example
//!
//! ```rust,ignore
//! use coverwise::api::{serve, ApiConfig, AppState};
//! use coverwise::auth::MemoryAuth;
//! use coverwise::email::OutboxSender;
//! use coverwise::store::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(
//!         store.clone(),
//!         store,
//!         Arc::new(MemoryAuth::new()),
//!         Arc::new(OutboxSender::new()),
//!         config.clone(),
//!     );
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::guard_middleware;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Quote routes
        .route("/quotes", post(routes::quotes::submit_quote))
        .route("/send-email", post(routes::email::send_email))
        // Content routes
        .route("/blog/categories", get(routes::content::list_categories))
        .route("/blog/categories/:label", get(routes::content::category))
        .route("/site", get(routes::site::site_settings));

    let auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let page_routes = Router::new()
        .route("/login", get(routes::auth::login_page))
        .route("/signup", get(routes::auth::signup_page))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route("/admin", get(routes::admin::admin_overview))
        .route("/admin/login", get(routes::auth::admin_login_page))
        .route("/admin/quotes/export", get(routes::admin::export_quotes));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let body_limit = state.config.max_body_size;

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/auth", auth_routes)
        .merge(page_routes)
        .nest("/health", health_routes)
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            guard_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Coverwise API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Coverwise API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryAuth, SESSION_COOKIE};
    use crate::email::{OutboxSender, ProviderError};
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    struct TestApp {
        router: Router,
        store: Arc<MemoryStore>,
        auth: Arc<MemoryAuth>,
        outbox: Arc<OutboxSender>,
    }

    impl TestApp {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let auth = Arc::new(MemoryAuth::new());
            let outbox = Arc::new(OutboxSender::new());

            let mut config = ApiConfig::default();
            config.email.from = "Coverwise <quotes@coverwise.test>".to_string();
            config.email.notify_to = vec!["agency@coverwise.test".to_string()];

            let state = AppState::new(
                store.clone(),
                store.clone(),
                auth.clone(),
                outbox.clone(),
                config,
            );

            Self {
                router: build_router(state),
                store,
                auth,
                outbox,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn get(&self, uri: &str, token: Option<&str>) -> Response {
            let mut builder = Request::builder().uri(uri);
            if let Some(token) = token {
                builder = builder.header("Cookie", format!("{}={}", SESSION_COOKIE, token));
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn post_json(&self, uri: &str, body: Value) -> Response {
            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn post_form(&self, uri: &str, body: &str, token: Option<&str>) -> Response {
            let mut builder = Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/x-www-form-urlencoded");
            if let Some(token) = token {
                builder = builder.header("Cookie", format!("{}={}", SESSION_COOKIE, token));
            }
            self.send(builder.body(Body::from(body.to_string())).unwrap())
                .await
        }

        /// Session for a user who is not an admin
        async fn agent_token(&self) -> String {
            let user_id = self.auth.register("agent@coverwise.test", "secret").await;
            self.auth
                .issue_session(&user_id, Some("agent@coverwise.test"))
                .await
                .access_token
        }

        async fn admin_token(&self) -> String {
            let user_id = self.auth.register("admin@coverwise.test", "secret").await;
            self.store.grant_admin(user_id.clone()).await;
            self.auth
                .issue_session(&user_id, Some("admin@coverwise.test"))
                .await
                .access_token
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn set_cookie(response: &Response) -> &str {
        response
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    fn email_body() -> Value {
        serde_json::json!({
            "firstName": "Dana",
            "lastName": "Reyes",
            "email": "dana@example.com",
            "coverageAmount": 500000,
            "coverageType": "Term Life",
            "termLength": "20"
        })
    }

    fn quote_body() -> Value {
        serde_json::json!({
            "gender": "female",
            "dateOfBirth": "1988-04-12",
            "healthStatus": "good",
            "coverageAmount": 500000,
            "termLength": 20,
            "firstName": "Dana",
            "lastName": "Reyes",
            "email": "dana@example.com",
            "phone": "555-0100"
        })
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new();

        for uri in ["/health/live", "/health/ready"] {
            let response = app.get(uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }

        let response = app.get("/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["store"], "memory");
        assert_eq!(json["store_status"], "ok");
        assert_eq!(json["email"], "outbox");
    }

    #[tokio::test]
    async fn test_readiness_follows_store() {
        let app = TestApp::new();
        app.store.set_fail_writes(true);

        let response = app.get("/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.get("/health/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(app.get("/health", None).await).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["store_status"], "error");
    }

    #[tokio::test]
    async fn test_send_email_success() {
        let app = TestApp::new();

        let response = app.post_json("/api/send-email", email_body()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["id"], "outbox-1");

        let sent = app.outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Quote Request from Dana Reyes");
        assert_eq!(sent[0].to, vec!["agency@coverwise.test".to_string()]);
        assert!(sent[0].html.contains("$500,000"));
    }

    #[tokio::test]
    async fn test_send_email_provider_rejection_is_400() {
        let app = TestApp::new();
        app.outbox.reject_with(ProviderError {
            status_code: Some(422),
            name: "validation_error".to_string(),
            message: "Invalid `to` field".to_string(),
        });

        let response = app.post_json("/api/send-email", email_body()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["name"], "validation_error");
        assert_eq!(json["error"]["message"], "Invalid `to` field");
    }

    #[tokio::test]
    async fn test_send_email_unreadable_body_is_500() {
        let app = TestApp::new();

        let response = app
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/api/send-email")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Error sending email");
        assert!(app.outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_submit_quote_stores_then_notifies() {
        let app = TestApp::new();

        let response = app.post_json("/api/quotes", quote_body()).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["data"][0]["first_name"], "Dana");
        assert_eq!(json["data"][0]["term_length"], 20);

        assert_eq!(app.store.records().await.len(), 1);
        assert_eq!(app.outbox.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_quote_store_failure_sends_nothing() {
        let app = TestApp::new();
        app.store.set_fail_writes(true);

        let response = app.post_json("/api/quotes", quote_body()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(app.outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_submit_quote_survives_email_rejection() {
        let app = TestApp::new();
        app.outbox.reject_with(ProviderError {
            status_code: Some(403),
            name: "forbidden".to_string(),
            message: "Domain not verified".to_string(),
        });

        let response = app.post_json("/api/quotes", quote_body()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(app.store.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let app = TestApp::new();

        let response = app.get("/dashboard", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let token = app.agent_token().await;
        app.post_json("/api/quotes", quote_body()).await;

        let response = app.get("/dashboard", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["user_email"], "agent@coverwise.test");
        assert_eq!(json["recent_quotes"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signed_in_visitor_leaves_login_and_signup() {
        let app = TestApp::new();
        let token = app.agent_token().await;

        for uri in ["/login", "/signup"] {
            let response = app.get(uri, Some(&token)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(location(&response), "/dashboard");
        }

        let response = app.get("/login", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_requires_session() {
        let app = TestApp::new();

        let response = app.get("/admin", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/login");

        let response = app.get("/admin/login", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_admin_is_signed_out() {
        let app = TestApp::new();
        let token = app.agent_token().await;
        assert_eq!(app.auth.active_sessions().await, 1);

        let response = app.get("/admin", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/login");
        assert!(set_cookie(&response).contains("Max-Age=0"));

        assert_eq!(app.auth.active_sessions().await, 0);
        let response = app.get("/dashboard", Some(&token)).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_admin_overview_and_export() {
        let app = TestApp::new();
        let token = app.admin_token().await;
        app.post_json("/api/quotes", quote_body()).await;

        let response = app.get("/admin", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["admin_email"], "admin@coverwise.test");
        assert_eq!(json["quote_count"], 1);

        let response = app.get("/admin/quotes/export", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/csv"
        );
        let csv = body_text(response).await;
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.starts_with("id,created_at,gender"));
        assert!(csv.contains("Dana"));
    }

    #[tokio::test]
    async fn test_admin_count_is_total_not_page() {
        let app = TestApp::new();
        let token = app.admin_token().await;
        for _ in 0..30 {
            app.post_json("/api/quotes", quote_body()).await;
        }

        let json = body_json(app.get("/admin", Some(&token)).await).await;
        assert_eq!(json["quote_count"], 30);
        assert_eq!(json["recent_quotes"].as_array().unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_redirects() {
        let app = TestApp::new();
        app.auth.register("agent@coverwise.test", "secret").await;

        let response = app
            .post_form(
                "/auth/login",
                "email=agent%40coverwise.test&password=secret",
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        assert!(set_cookie(&response).starts_with(SESSION_COOKIE));
        assert_eq!(app.auth.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let app = TestApp::new();
        app.auth.register("agent@coverwise.test", "secret").await;

        let response = app
            .post_form(
                "/auth/login",
                "email=agent%40coverwise.test&password=wrong",
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.auth.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = TestApp::new();
        let token = app.agent_token().await;

        let response = app.post_form("/auth/logout", "", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
        assert!(set_cookie(&response).contains("Max-Age=0"));
        assert_eq!(app.auth.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_category_falls_back_to_general() {
        let app = TestApp::new();

        let response = app.get("/api/blog/categories/Cryptocurrency", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["category"], "General");
        assert_eq!(json["icon"], "book-open");

        let response = app.get("/api/blog/categories", None).await;
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 8);
    }
}
