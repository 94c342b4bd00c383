pub mod password;
pub mod visitor;

pub use password::PasswordService;
pub use visitor::{consent_cookie, request_is_secure, set_cookie, VisitorSession};
