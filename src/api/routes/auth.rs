//! Auth Routes
//!
//! - GET  /login - Agent login form
//! - GET  /signup - Signup notice
//! - GET  /admin/login - Admin login form
//! - POST /auth/login - Sign in and set the session cookie
//! - POST /auth/logout - Sign out and clear the session cookie

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::api::dto::LoginRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::auth::{clear_session, session_cookie, session_from_jar, AuthError};

fn login_form(title: &str, next: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html>
<head><title>{title} | Coverwise</title></head>
<body>
  <h1>{title}</h1>
  <form method="post" action="/auth/login">
    <input type="hidden" name="next" value="{next}">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Sign in</button>
  </form>
</body>
</html>"#
    ))
}

/// GET /login
pub async fn login_page(State(state): State<Arc<AppState>>) -> Html<String> {
    login_form("Agent Login", &state.guard.dashboard_prefix)
}

/// GET /admin/login
pub async fn admin_login_page(State(state): State<Arc<AppState>>) -> Html<String> {
    login_form("Admin Login", &state.guard.admin_prefix)
}

/// GET /signup
pub async fn signup_page() -> Html<&'static str> {
    Html(
        r#"<!doctype html>
<html>
<head><title>Sign up | Coverwise</title></head>
<body>
  <h1>Become a Coverwise agent</h1>
  <p>Agent accounts are created by an administrator. Contact us to get started.</p>
  <a href="/login">Already have an account? Sign in</a>
</body>
</html>"#,
    )
}

/// Only same-site absolute paths are followed after login.
///
/// Browsers read a leading `//` or `/\` as another host.
fn safe_next(next: Option<&str>, fallback: &str) -> String {
    let same_site = |path: &str| {
        let mut chars = path.chars();
        chars.next() == Some('/')
            && !matches!(chars.next(), Some('/') | Some('\\'))
            && !path.chars().any(char::is_control)
    };

    match next {
        Some(path) if same_site(path) => path.to_string(),
        _ => fallback.to_string(),
    }
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> ApiResult<Response> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let session = match state
        .auth
        .sign_in_with_password(req.email.trim(), &req.password)
        .await
    {
        Ok(session) => session,
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(email = %req.email, "Rejected login");
            return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let target = safe_next(req.next.as_deref(), &state.guard.dashboard_prefix);
    let cookie = session_cookie(&session.access_token, state.config.cookie_secure);

    Ok((jar.add(cookie), Redirect::to(&target)).into_response())
}

/// POST /auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(session) = session_from_jar(state.auth.as_ref(), &jar).await {
        if let Err(e) = state.auth.sign_out(&session).await {
            tracing::warn!(user_id = %session.user_id, error = %e, "Provider sign out failed");
        }
    }

    (clear_session(jar), Redirect::to(&state.guard.login_path)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/admin"), "/dashboard"), "/admin");
        assert_eq!(safe_next(Some("//evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("https://evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some(""), "/dashboard"), "/dashboard");
    }

    #[test]
    fn test_safe_next_rejects_backslash_host() {
        assert_eq!(safe_next(Some("/\\evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/\\/evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/\tevil"), "/dashboard"), "/dashboard");
        assert_eq!(safe_next(Some("/admin/quotes"), "/dashboard"), "/admin/quotes");
    }
}
