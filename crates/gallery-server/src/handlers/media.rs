use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_sessions::Session;

use super::find_album;
use crate::access::gate::BLUR_VARIANT;
use crate::access::AccessDecision;
use crate::security::VisitorSession;
use crate::state::AppState;
use crate::utils::error::ApiError;

const PUBLIC_CACHE: &str = "public, max-age=86400";
const PRIVATE_CACHE: &str = "private, no-store";

/// GET /media/{album_id}/{variant}/{file}
///
/// Serves `<media root>/<album_id>/<variant>/<file>` when the gate allows it.
pub async fn serve_media(
    State(state): State<AppState>,
    Path((album_id, variant, file)): Path<(i64, String, String)>,
    session: Session,
    request: Request,
) -> Result<Response, ApiError> {
    if !is_safe_segment(&variant) || !is_safe_segment(&file) {
        return Err(ApiError::BadRequest("invalid media path".to_string()));
    }
    let variant = variant.to_ascii_lowercase();

    let album = find_album(&state, album_id).await?;

    let mut visit = VisitorSession::load(session, request.headers()).await?;
    let decision = state.gate.validate_album_access(
        &mut visit.visitor,
        album.id,
        album.is_password_protected(),
        album.is_nsfw,
        Some(&variant),
    );
    visit.commit().await?;

    if let AccessDecision::Deny(reason) = decision {
        return Err(ApiError::Forbidden(reason.as_str().to_string()));
    }

    let path = state
        .settings
        .media
        .root
        .join(album.id.to_string())
        .join(&variant)
        .join(&file);

    let mut response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };

    if response.status().is_success() {
        let gated = variant != BLUR_VARIANT && (album.is_nsfw || album.is_password_protected());
        let cache = if gated { PRIVATE_CACHE } else { PUBLIC_CACHE };
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
    }

    Ok(response)
}

/// A single path component: no separators, no dot-prefixed names.
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_segments() {
        for ok in ["original", "blur", "IMG_0042.jpg", "cover-2x.webp"] {
            assert!(is_safe_segment(ok), "{}", ok);
        }
        for bad in ["", ".", "..", ".hidden", "a/b", "a\\b", "white space.jpg", "%2e%2e"] {
            assert!(!is_safe_segment(bad), "{}", bad);
        }
    }
}
