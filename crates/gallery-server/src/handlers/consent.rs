use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::find_album;
use crate::security::{request_is_secure, set_cookie, VisitorSession};
use crate::state::AppState;
use crate::utils::error::ApiError;

/// POST /api/nsfw-consent
pub async fn grant_global_consent(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    grant(&state, session, &headers, None).await
}

/// POST /api/albums/{album_id}/nsfw-consent
pub async fn grant_album_consent(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let album = find_album(&state, album_id).await?;
    grant(&state, session, &headers, Some(album.id)).await
}

async fn grant(
    state: &AppState,
    session: Session,
    headers: &HeaderMap,
    album_id: Option<i64>,
) -> Result<Response, ApiError> {
    let secure = request_is_secure(headers, state.settings.server.force_secure_cookies);

    let mut visit = VisitorSession::load(session, headers).await?;
    let cookie = state
        .gate
        .grant_nsfw_consent(&mut visit.visitor, album_id, secure);
    visit.commit().await?;

    let mut response = StatusCode::NO_CONTENT.into_response();
    if let Some(cookie) = cookie {
        set_cookie(&mut response, &cookie);
    }
    Ok(response)
}
