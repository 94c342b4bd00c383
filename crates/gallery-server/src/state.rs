use axum::extract::FromRef;
use std::sync::Arc;

use crate::access::AccessGate;
use crate::config::Settings;
use crate::database::AlbumRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub gate: Arc<AccessGate>,
    pub albums: Arc<dyn AlbumRepository>,
}

impl FromRef<AppState> for Arc<AccessGate> {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AlbumRepository> {
    fn from_ref(state: &AppState) -> Self {
        state.albums.clone()
    }
}
