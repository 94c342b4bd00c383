use serde_json::Value;
use std::collections::HashMap;

pub const ALBUM_ACCESS_KEY: &str = "album_access";
pub const NSFW_CONFIRMED_GLOBAL_KEY: &str = "nsfw_confirmed_global";
pub const NSFW_CONFIRMED_KEY: &str = "nsfw_confirmed";
pub const ADMIN_ID_KEY: &str = "admin_id";

/// Session values as they come out of the store, before any validation.
#[derive(Debug, Clone, Default)]
pub struct RawSession {
    pub album_access: Option<Value>,
    pub nsfw_confirmed_global: Option<Value>,
    pub nsfw_confirmed: Option<Value>,
    pub admin_id: Option<Value>,
}

/// Per-visitor access state, read at request start and written back at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// album id -> unix timestamp of the password grant
    pub album_access: HashMap<i64, i64>,
    pub nsfw_confirmed_global: bool,
    pub nsfw_confirmed: HashMap<i64, bool>,
    pub admin_id: Option<i64>,
}

impl SessionContext {
    pub fn is_admin(&self) -> bool {
        self.admin_id.is_some()
    }
}

impl From<RawSession> for SessionContext {
    /// Anything malformed is dropped rather than reported; a broken entry
    /// simply means "no grant".
    fn from(raw: RawSession) -> Self {
        Self {
            album_access: id_map(raw.album_access, Value::as_i64),
            nsfw_confirmed_global: raw
                .nsfw_confirmed_global
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            nsfw_confirmed: id_map(raw.nsfw_confirmed, Value::as_bool)
                .into_iter()
                .filter(|(_, confirmed)| *confirmed)
                .collect(),
            admin_id: raw
                .admin_id
                .and_then(|v| v.as_i64())
                .filter(|id| *id > 0),
        }
    }
}

/// Object keyed by album id. Keys that are not positive integers and values
/// rejected by `extract` are skipped.
fn id_map<T>(value: Option<Value>, extract: fn(&Value) -> Option<T>) -> HashMap<i64, T> {
    let Some(Value::Object(entries)) = value else {
        return HashMap::new();
    };

    entries
        .iter()
        .filter_map(|(key, value)| {
            let id = key.parse::<i64>().ok().filter(|id| *id > 0)?;
            Some((id, extract(value)?))
        })
        .collect()
}
