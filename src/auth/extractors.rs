use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::warn;

use super::session::{self, AuthSession, Role};
use crate::flash::{self, FlashLevel};

/// Guard failure: back to the login page, nothing else happens.
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

async fn load<S>(parts: &mut Parts, state: &S) -> Result<(Session, Option<AuthSession>), LoginRedirect>
where
    S: Send + Sync,
{
    let session = Session::from_request_parts(parts, state)
        .await
        .map_err(|(status, msg)| {
            warn!(%status, msg, "session layer missing");
            LoginRedirect
        })?;
    let auth = session::current(&session).await;
    Ok((session, auth))
}

async fn deny(session: &Session, message: &str) -> LoginRedirect {
    flash::push(session, FlashLevel::Danger, message).await;
    LoginRedirect
}

/// A logged-in admin, plus the session for flashing results.
pub struct RequireAdmin {
    pub auth: AuthSession,
    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (session, auth) = load(parts, state).await?;
        match auth {
            Some(auth) if auth.is_admin() => Ok(RequireAdmin { auth, session }),
            other => {
                warn!(user = ?other.map(|a| a.username), uri = %parts.uri, "admin access denied");
                Err(deny(&session, "Access denied. Please log in as admin.").await)
            }
        }
    }
}

/// A logged-in student. Handlers still check the id with [`RequireStudent::owns`].
pub struct RequireStudent {
    pub auth: AuthSession,
    pub session: Session,
}

impl RequireStudent {
    pub async fn owns(&self, student_id: i32) -> Result<(), LoginRedirect> {
        if self.auth.is_student(student_id) {
            Ok(())
        } else {
            warn!(user_id = self.auth.user_id, student_id, "student view of another id denied");
            Err(deny(&self.session, "Access denied.").await)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireStudent
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (session, auth) = load(parts, state).await?;
        match auth {
            Some(auth) if auth.logged_in && auth.role == Role::Student => {
                Ok(RequireStudent { auth, session })
            }
            _ => Err(deny(&session, "Access denied.").await),
        }
    }
}
