//! Routing Guard
//!
//! Per-request redirects based only on whether the visitor has a session and
//! which path they asked for. Three rules, checked in order, first match wins:
//!
//! 1. no session, path under the dashboard prefix → login
//! 2. session, path is login or signup → dashboard
//! 3. no session, path under the admin prefix (not admin login) → admin login
//!
//! Everything else passes through. The rules never overlap with the default
//! paths.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use std::sync::Arc;

use super::session_from_jar;
use crate::api::AppState;

/// Paths the guard knows about
#[derive(Debug, Clone, Deserialize)]
pub struct GuardConfig {
    #[serde(default = "default_dashboard_prefix")]
    pub dashboard_prefix: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Public paths a signed-in visitor is bounced away from
    #[serde(default = "default_signed_in_redirects")]
    pub signed_in_redirects: Vec<String>,

    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,

    #[serde(default = "default_admin_login_path")]
    pub admin_login_path: String,
}

fn default_dashboard_prefix() -> String {
    "/dashboard".to_string()
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_signed_in_redirects() -> Vec<String> {
    vec!["/login".to_string(), "/signup".to_string()]
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

fn default_admin_login_path() -> String {
    "/admin/login".to_string()
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            dashboard_prefix: default_dashboard_prefix(),
            login_path: default_login_path(),
            signed_in_redirects: default_signed_in_redirects(),
            admin_prefix: default_admin_prefix(),
            admin_login_path: default_admin_login_path(),
        }
    }
}

impl GuardConfig {
    /// Whether the guard has an opinion about this path at all.
    ///
    /// Paths outside every rule skip the session lookup.
    pub fn watches(&self, path: &str) -> bool {
        under_prefix(path, &self.dashboard_prefix)
            || under_prefix(path, &self.admin_prefix)
            || self.is_signed_in_redirect(path)
    }

    fn is_signed_in_redirect(&self, path: &str) -> bool {
        path == self.login_path || self.signed_in_redirects.iter().any(|p| p == path)
    }
}

/// Outcome for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(String),
}

/// `path` equals `prefix` or continues it with a new segment
fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

/// Decide what to do with a request
pub fn evaluate(config: &GuardConfig, has_session: bool, path: &str) -> GuardDecision {
    if !has_session && under_prefix(path, &config.dashboard_prefix) {
        return GuardDecision::Redirect(config.login_path.clone());
    }

    if has_session && config.is_signed_in_redirect(path) {
        return GuardDecision::Redirect(config.dashboard_prefix.clone());
    }

    if !has_session
        && under_prefix(path, &config.admin_prefix)
        && path != config.admin_login_path
    {
        return GuardDecision::Redirect(config.admin_login_path.clone());
    }

    GuardDecision::Pass
}

/// Axum middleware applying [`evaluate`] to every request
pub async fn guard_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !state.guard.watches(&path) {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    let has_session = session_from_jar(state.auth.as_ref(), &jar)
        .await
        .is_some();

    match evaluate(&state.guard, has_session, &path) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %path, has_session, redirect = %to, "Guard redirect");
            Redirect::to(&to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GuardConfig {
        GuardConfig::default()
    }

    #[test]
    fn test_anonymous_dashboard_goes_to_login() {
        for path in ["/dashboard", "/dashboard/", "/dashboard/quotes/42"] {
            assert_eq!(
                evaluate(&config(), false, path),
                GuardDecision::Redirect("/login".to_string()),
                "path {}",
                path
            );
        }
    }

    #[test]
    fn test_signed_in_login_and_signup_go_to_dashboard() {
        for path in ["/login", "/signup"] {
            assert_eq!(
                evaluate(&config(), true, path),
                GuardDecision::Redirect("/dashboard".to_string())
            );
        }
    }

    #[test]
    fn test_anonymous_admin_goes_to_admin_login() {
        for path in ["/admin", "/admin/quotes/export", "/admin/users"] {
            assert_eq!(
                evaluate(&config(), false, path),
                GuardDecision::Redirect("/admin/login".to_string())
            );
        }
    }

    #[test]
    fn test_admin_login_itself_passes() {
        assert_eq!(evaluate(&config(), false, "/admin/login"), GuardDecision::Pass);
        assert_eq!(evaluate(&config(), true, "/admin/login"), GuardDecision::Pass);
    }

    #[test]
    fn test_pass_through_combinations() {
        let cfg = config();
        assert_eq!(evaluate(&cfg, true, "/dashboard"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, true, "/admin"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, false, "/login"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, false, "/signup"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, false, "/"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, true, "/blog/term-life"), GuardDecision::Pass);
    }

    #[test]
    fn test_prefix_is_segment_aware() {
        let cfg = config();
        assert_eq!(evaluate(&cfg, false, "/dashboards"), GuardDecision::Pass);
        assert_eq!(evaluate(&cfg, false, "/administrator"), GuardDecision::Pass);
        assert!(!cfg.watches("/blog"));
        assert!(cfg.watches("/admin/login"));
    }

    #[test]
    fn test_custom_paths() {
        let cfg: GuardConfig = toml::from_str(
            r#"
            dashboard_prefix = "/agent"
            login_path = "/sign-in"
            signed_in_redirects = ["/sign-in", "/get-started"]
            "#,
        )
        .unwrap();

        assert_eq!(
            evaluate(&cfg, false, "/agent/leads"),
            GuardDecision::Redirect("/sign-in".to_string())
        );
        assert_eq!(
            evaluate(&cfg, true, "/get-started"),
            GuardDecision::Redirect("/agent".to_string())
        );
        assert_eq!(cfg.admin_login_path, "/admin/login");
    }
}
