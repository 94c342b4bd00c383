//! Access policy for NSFW and password-protected albums.

pub mod clock;
pub mod consent;
pub mod gate;
pub mod identity;
pub mod session_context;

pub use clock::{Clock, SystemClock};
pub use consent::{ConsentSigner, CONSENT_COOKIE_NAME, CONSENT_TTL_SECONDS};
pub use gate::{AccessDecision, AccessGate, DenyReason, PageChallenge, PASSWORD_GRANT_WINDOW_SECONDS};
pub use identity::VisitorIdentity;
pub use session_context::{RawSession, SessionContext};
