pub mod admin;
pub mod albums;
pub mod consent;
pub mod health;
pub mod media;

use crate::database::Album;
use crate::state::AppState;
use crate::utils::error::ApiError;

/// Load an album or fail with 404.
async fn find_album(state: &AppState, album_id: i64) -> Result<Album, ApiError> {
    if album_id <= 0 {
        return Err(ApiError::NotFound(format!("album {}", album_id)));
    }

    state
        .albums
        .find_by_id(album_id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::NotFound(format!("album {}", album_id)))
}
