use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use super::find_album;
use crate::access::PageChallenge;
use crate::database::Album;
use crate::security::{PasswordService, VisitorSession};
use crate::state::AppState;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    pub id: i64,
    pub title: String,
    pub is_nsfw: bool,
    pub password_protected: bool,
}

impl From<&Album> for AlbumResponse {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id,
            title: album.title.clone(),
            is_nsfw: album.is_nsfw,
            password_protected: album.is_password_protected(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// GET /api/albums/{album_id} - album page gate
pub async fn get_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    session: Session,
    headers: HeaderMap,
) -> Result<Json<AlbumResponse>, ApiError> {
    let album = find_album(&state, album_id).await?;

    let mut visit = VisitorSession::load(session, &headers).await?;
    let outcome = state.gate.check_album_page(&mut visit.visitor, &album);
    // expiry purges and cookie-derived consent are persisted even on a challenge
    visit.commit().await?;

    match outcome {
        Ok(()) => Ok(Json(AlbumResponse::from(&album))),
        Err(PageChallenge::PasswordRequired) => {
            Err(ApiError::Unauthorized("password_required".to_string()))
        }
        Err(PageChallenge::NsfwConsentRequired) => {
            Err(ApiError::Forbidden("nsfw_consent_required".to_string()))
        }
    }
}

/// POST /api/albums/{album_id}/unlock
pub async fn unlock_album(
    State(state): State<AppState>,
    Path(album_id): Path<i64>,
    session: Session,
    headers: HeaderMap,
    Json(payload): Json<UnlockRequest>,
) -> Result<StatusCode, ApiError> {
    let album = find_album(&state, album_id).await?;

    let Some(hash) = album.password_hash.as_deref().filter(|h| !h.is_empty()) else {
        return Ok(StatusCode::NO_CONTENT);
    };

    let matches = PasswordService::verify(&payload.password, hash).unwrap_or_else(|e| {
        warn!("Album {} has an unreadable password hash: {}", album.id, e);
        false
    });

    if !matches {
        info!("Wrong password for album {}", album.id);
        return Err(ApiError::Unauthorized("invalid_password".to_string()));
    }

    let mut visit = VisitorSession::load(session, &headers).await?;
    state.gate.grant_album_password_access(&mut visit.visitor, album.id);
    visit.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
