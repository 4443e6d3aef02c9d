use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

const AUTH_KEY: &str = "auth";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

/// Identity stored in the session after a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub logged_in: bool,
    pub role: Role,
    pub user_id: i32,
    pub username: String,
}

impl AuthSession {
    pub fn new(role: Role, user_id: i32, username: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            role,
            user_id,
            username: username.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.logged_in && self.role == Role::Admin
    }

    pub fn is_student(&self, student_id: i32) -> bool {
        self.logged_in && self.role == Role::Student && self.user_id == student_id
    }

    /// Where this user lands after logging in.
    pub fn home(&self) -> String {
        match self.role {
            Role::Admin => "/admin/dashboard".into(),
            Role::Student => format!("/student/dashboard/{}", self.user_id),
        }
    }
}

/// Stores `auth` under a fresh session id.
pub async fn establish(session: &Session, auth: &AuthSession) -> anyhow::Result<()> {
    session.cycle_id().await?;
    session.insert(AUTH_KEY, auth).await?;
    Ok(())
}

pub async fn current(session: &Session) -> Option<AuthSession> {
    match session.get::<AuthSession>(AUTH_KEY).await {
        Ok(auth) => auth,
        Err(e) => {
            warn!(error = %e, "unreadable auth session");
            None
        }
    }
}

pub async fn logout(session: &Session) -> anyhow::Result<()> {
    session.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    #[test]
    fn role_checks() {
        let admin = AuthSession::new(Role::Admin, 1, "root");
        assert!(admin.is_admin());
        assert!(!admin.is_student(1));
        assert_eq!(admin.home(), "/admin/dashboard");

        let student = AuthSession::new(Role::Student, 101, "alice");
        assert!(student.is_student(101));
        assert!(!student.is_student(102));
        assert!(!student.is_admin());
        assert_eq!(student.home(), "/student/dashboard/101");

        let stale = AuthSession {
            logged_in: false,
            ..admin
        };
        assert!(!stale.is_admin());
    }

    #[tokio::test]
    async fn establish_then_logout() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        assert!(current(&session).await.is_none());

        let auth = AuthSession::new(Role::Student, 7, "bob");
        establish(&session, &auth).await.unwrap();
        assert_eq!(current(&session).await, Some(auth));

        logout(&session).await.unwrap();
        assert!(current(&session).await.is_none());
    }
}
