use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};

use crate::config::Settings;
use crate::handlers;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "gallery_session";

pub fn session_layer(settings: &Settings) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            settings.security.session_inactivity_seconds,
        )))
        .with_secure(settings.server.force_secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

pub fn build_router(state: AppState) -> Router {
    let sessions = session_layer(&state.settings);

    // Probes carry no visitor state
    let public_routes: Router<AppState> = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let visitor_routes: Router<AppState> = Router::new()
        .route("/api/albums/{album_id}", get(handlers::albums::get_album))
        .route("/api/albums/{album_id}/unlock", post(handlers::albums::unlock_album))
        .route(
            "/api/albums/{album_id}/nsfw-consent",
            post(handlers::consent::grant_album_consent),
        )
        .route("/api/nsfw-consent", post(handlers::consent::grant_global_consent))
        .route("/api/admin/login", post(handlers::admin::login))
        .route("/api/admin/logout", post(handlers::admin::logout))
        .route(
            "/media/{album_id}/{variant}/{file}",
            get(handlers::media::serve_media),
        )
        .layer(sessions);

    Router::new()
        .merge(public_routes)
        .merge(visitor_routes)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
