use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub is_nsfw: bool,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

impl Album {
    pub fn is_password_protected(&self) -> bool {
        self.password_hash
            .as_deref()
            .is_some_and(|hash| !hash.is_empty())
    }
}
