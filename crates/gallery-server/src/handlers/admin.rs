use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, info, warn};

use crate::security::{PasswordService, VisitorSession};
use crate::state::AppState;
use crate::utils::error::ApiError;

/// Single administrator account; the id only marks the session as admin.
const ADMIN_ID: i64 = 1;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<AdminLoginRequest>,
) -> Result<StatusCode, ApiError> {
    let Some(hash) = state.settings.admin_password_hash() else {
        return Err(ApiError::Forbidden("admin login disabled".to_string()));
    };

    match PasswordService::verify(&payload.password, hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Failed admin login attempt");
            return Err(ApiError::Unauthorized("invalid_password".to_string()));
        }
        Err(e) => {
            error!("Configured admin password hash is invalid: {}", e);
            return Err(ApiError::InternalError("admin login misconfigured".to_string()));
        }
    }

    let mut visit = VisitorSession::load(session, &headers).await?;
    visit.renew_id().await?;
    visit.visitor.sign_in_admin(ADMIN_ID);
    visit.commit().await?;

    info!("Administrator signed in");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/admin/logout
pub async fn logout(session: Session, headers: HeaderMap) -> Result<StatusCode, ApiError> {
    let mut visit = VisitorSession::load(session, &headers).await?;
    if visit.visitor.is_admin {
        visit.visitor.sign_out_admin();
        info!("Administrator signed out");
    }
    visit.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
