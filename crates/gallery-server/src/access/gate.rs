use std::sync::Arc;
use tower_sessions::cookie::{time::Duration, Cookie, SameSite};
use tracing::{debug, info};

use super::clock::Clock;
use super::consent::{ConsentSigner, CONSENT_COOKIE_NAME, CONSENT_TTL_SECONDS};
use super::identity::VisitorIdentity;
use crate::database::Album;

/// Password grants stay valid this long after entry.
pub const PASSWORD_GRANT_WINDOW_SECONDS: i64 = 24 * 60 * 60;

/// Placeholder rendition that is always public so listings can show it.
pub const BLUR_VARIANT: &str = "blur";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Nsfw,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Nsfw => "nsfw",
        }
    }
}

/// Outcome of a media access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Challenge the album page must present before showing its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChallenge {
    PasswordRequired,
    NsfwConsentRequired,
}

/// Access policy for protected albums.
///
/// Holds no per-visitor state; every check works on the [`VisitorIdentity`]
/// passed in and may update its session context (grant expiry, consent
/// caching). Callers persist the context afterwards.
pub struct AccessGate {
    signer: Option<ConsentSigner>,
    clock: Arc<dyn Clock>,
}

impl AccessGate {
    pub fn new(consent_secret: Option<&str>, clock: Arc<dyn Clock>) -> Self {
        Self {
            signer: ConsentSigner::new(consent_secret),
            clock,
        }
    }

    /// Whether consent survives the session via the signed cookie.
    pub fn persistent_consent_enabled(&self) -> bool {
        self.signer.is_some()
    }

    pub fn has_album_password_access(&self, visitor: &mut VisitorIdentity, album_id: i64) -> bool {
        if album_id <= 0 {
            return false;
        }

        let Some(&granted_at) = visitor.session.album_access.get(&album_id) else {
            return false;
        };

        if self.clock.now().saturating_sub(granted_at) >= PASSWORD_GRANT_WINDOW_SECONDS {
            visitor.session.album_access.remove(&album_id);
            debug!("Password grant for album {} expired", album_id);
            return false;
        }

        true
    }

    pub fn grant_album_password_access(&self, visitor: &mut VisitorIdentity, album_id: i64) {
        if album_id <= 0 {
            return;
        }

        visitor.session.album_access.insert(album_id, self.clock.now());
        info!("Password access granted for album {}", album_id);
    }

    pub fn has_nsfw_consent(&self, visitor: &mut VisitorIdentity) -> bool {
        if visitor.is_admin || visitor.session.nsfw_confirmed_global {
            return true;
        }

        let Some(signer) = &self.signer else {
            return false;
        };
        let Some(cookie) = visitor.consent_cookie.as_deref() else {
            return false;
        };

        if signer.verify(cookie, self.clock.now()) {
            // cache so later checks in this session skip the HMAC
            visitor.session.nsfw_confirmed_global = true;
            return true;
        }

        false
    }

    pub fn has_nsfw_album_consent(&self, visitor: &mut VisitorIdentity, album_id: i64) -> bool {
        self.has_nsfw_consent(visitor)
            || visitor.session.nsfw_confirmed.get(&album_id).copied().unwrap_or(false)
    }

    /// Record consent in the session and build the long-lived cookie.
    ///
    /// Returns `None` when no signing secret is configured; consent then
    /// lasts only as long as the session.
    pub fn grant_nsfw_consent(
        &self,
        visitor: &mut VisitorIdentity,
        album_id: Option<i64>,
        secure: bool,
    ) -> Option<Cookie<'static>> {
        visitor.session.nsfw_confirmed_global = true;
        if let Some(id) = album_id.filter(|id| *id > 0) {
            visitor.session.nsfw_confirmed.insert(id, true);
        }
        info!("NSFW consent granted (album: {:?})", album_id);

        let signer = self.signer.as_ref()?;
        let value = signer.sign(self.clock.now());

        Some(
            Cookie::build((CONSENT_COOKIE_NAME, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(secure)
                .max_age(Duration::seconds(CONSENT_TTL_SECONDS))
                .build(),
        )
    }

    /// Media-level check for one rendition of an album image.
    ///
    /// Password protection is enforced on the album page only; media URLs
    /// stay servable so covers render in listings.
    pub fn validate_album_access(
        &self,
        visitor: &mut VisitorIdentity,
        album_id: i64,
        _is_password_protected: bool,
        is_nsfw: bool,
        variant: Option<&str>,
    ) -> AccessDecision {
        if visitor.is_admin {
            return AccessDecision::Allow;
        }

        if variant.is_some_and(|v| v.eq_ignore_ascii_case(BLUR_VARIANT)) {
            return AccessDecision::Allow;
        }

        if is_nsfw && !self.has_nsfw_album_consent(visitor, album_id) {
            debug!("Media of album {} denied: nsfw consent missing", album_id);
            return AccessDecision::Deny(DenyReason::Nsfw);
        }

        AccessDecision::Allow
    }

    /// Page-level check: password first, then NSFW consent.
    pub fn check_album_page(
        &self,
        visitor: &mut VisitorIdentity,
        album: &Album,
    ) -> Result<(), PageChallenge> {
        if visitor.is_admin {
            return Ok(());
        }

        if album.is_password_protected() && !self.has_album_password_access(visitor, album.id) {
            debug!("Album {} page requires password", album.id);
            return Err(PageChallenge::PasswordRequired);
        }

        if album.is_nsfw && !self.has_nsfw_album_consent(visitor, album.id) {
            debug!("Album {} page requires nsfw consent", album.id);
            return Err(PageChallenge::NsfwConsentRequired);
        }

        Ok(())
    }
}
