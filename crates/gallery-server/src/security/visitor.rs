//! Loading and persisting the visitor's access state around a request.

use axum::http::{header, HeaderMap, HeaderValue, Response};
use serde_json::Value;
use tower_sessions::{cookie::Cookie, Session};
use tracing::{debug, warn};

use crate::access::session_context::{
    ADMIN_ID_KEY, ALBUM_ACCESS_KEY, NSFW_CONFIRMED_GLOBAL_KEY, NSFW_CONFIRMED_KEY,
};
use crate::access::{RawSession, SessionContext, VisitorIdentity, CONSENT_COOKIE_NAME};
use crate::utils::error::ApiError;

/// A visitor bound to its session for the duration of one request.
///
/// Keeps the context as loaded so [`VisitorSession::commit`] only writes
/// when a check or grant actually changed something.
pub struct VisitorSession {
    session: Session,
    snapshot: SessionContext,
    pub visitor: VisitorIdentity,
}

impl VisitorSession {
    pub async fn load(session: Session, headers: &HeaderMap) -> Result<Self, ApiError> {
        let raw = RawSession {
            album_access: session.get::<Value>(ALBUM_ACCESS_KEY).await?,
            nsfw_confirmed_global: session.get::<Value>(NSFW_CONFIRMED_GLOBAL_KEY).await?,
            nsfw_confirmed: session.get::<Value>(NSFW_CONFIRMED_KEY).await?,
            admin_id: session.get::<Value>(ADMIN_ID_KEY).await?,
        };

        let snapshot = SessionContext::from(raw);
        let visitor = VisitorIdentity::new(snapshot.clone(), consent_cookie(headers));

        Ok(Self {
            session,
            snapshot,
            visitor,
        })
    }

    /// Issue a fresh session id, e.g. after a privilege change.
    pub async fn renew_id(&self) -> Result<(), ApiError> {
        self.session.cycle_id().await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), ApiError> {
        let ctx = &self.visitor.session;
        if *ctx == self.snapshot {
            return Ok(());
        }

        if ctx.album_access != self.snapshot.album_access {
            self.session.insert(ALBUM_ACCESS_KEY, &ctx.album_access).await?;
        }
        if ctx.nsfw_confirmed_global != self.snapshot.nsfw_confirmed_global {
            self.session
                .insert(NSFW_CONFIRMED_GLOBAL_KEY, ctx.nsfw_confirmed_global)
                .await?;
        }
        if ctx.nsfw_confirmed != self.snapshot.nsfw_confirmed {
            self.session.insert(NSFW_CONFIRMED_KEY, &ctx.nsfw_confirmed).await?;
        }
        if ctx.admin_id != self.snapshot.admin_id {
            match ctx.admin_id {
                Some(id) => self.session.insert(ADMIN_ID_KEY, id).await?,
                None => {
                    self.session.remove::<Value>(ADMIN_ID_KEY).await?;
                }
            }
        }

        debug!("Visitor session state updated");
        Ok(())
    }
}

/// Value of the `nsfw_consent` cookie from the request's `Cookie` headers.
pub fn consent_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == CONSENT_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Whether the client reached us over https (directly or via a proxy).
pub fn request_is_secure(headers: &HeaderMap, force_secure: bool) -> bool {
    force_secure
        || headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

/// Append a `Set-Cookie` header for `cookie`.
pub fn set_cookie<B>(response: &mut Response<B>, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!("Dropping unencodable cookie {}: {}", cookie.name(), e),
    }
}
