use super::session_context::SessionContext;

/// Everything the gate knows about the visitor for one request.
#[derive(Debug, Clone, Default)]
pub struct VisitorIdentity {
    pub is_admin: bool,
    pub session: SessionContext,
    /// Raw value of the `nsfw_consent` cookie, if the request carried one.
    pub consent_cookie: Option<String>,
}

impl VisitorIdentity {
    pub fn new(session: SessionContext, consent_cookie: Option<String>) -> Self {
        Self {
            is_admin: session.is_admin(),
            session,
            consent_cookie,
        }
    }

    pub fn sign_in_admin(&mut self, admin_id: i64) {
        self.session.admin_id = Some(admin_id);
        self.is_admin = true;
    }

    pub fn sign_out_admin(&mut self) {
        self.session.admin_id = None;
        self.is_admin = false;
    }
}
