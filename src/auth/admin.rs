//! Admin Gate
//!
//! Runs inside every admin page handler, after the routing guard. It fetches
//! the session again and checks the admin role, which the guard cannot see.
//! A signed-in user without the role is signed out at the provider.

use super::{AuthProvider, RoleDirectory, Session};

/// Result of the admin check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAccess {
    Granted(Session),
    Denied {
        redirect_to: String,
        /// The provider session was revoked as part of the denial
        signed_out: bool,
    },
}

/// Check that `access_token` belongs to an admin.
pub async fn admin_gate(
    auth: &dyn AuthProvider,
    roles: &dyn RoleDirectory,
    access_token: Option<&str>,
    admin_login_path: &str,
) -> AdminAccess {
    let denied = |signed_out| AdminAccess::Denied {
        redirect_to: admin_login_path.to_string(),
        signed_out,
    };

    let session = match access_token {
        Some(token) => match auth.current_session(token).await {
            Ok(Some(session)) => session,
            Ok(None) => return denied(false),
            Err(e) => {
                tracing::warn!(error = %e, "Admin session lookup failed");
                return denied(false);
            }
        },
        None => return denied(false),
    };

    match roles.is_admin(&session).await {
        Ok(true) => AdminAccess::Granted(session),
        Ok(false) => {
            tracing::warn!(user_id = %session.user_id, "Non-admin reached admin area, signing out");
            if let Err(e) = auth.sign_out(&session).await {
                tracing::error!(user_id = %session.user_id, error = %e, "Sign out failed");
                return denied(false);
            }
            denied(true)
        }
        Err(e) => {
            tracing::error!(user_id = %session.user_id, error = %e, "Admin role lookup failed");
            denied(false)
        }
    }
}
