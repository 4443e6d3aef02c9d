use serde::{Deserialize, Serialize};

use crate::flash::Flash;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// What `GET /login` returns.
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub flashes: Vec<Flash>,
}
