use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admin account record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub admin_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 PHC string
}

/// The columns the authenticator needs from either account table.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}
