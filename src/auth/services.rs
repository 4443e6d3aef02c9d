use axum::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::{
    password::{hash_password, password_matches},
    repo,
    repo_types::{Admin, Credential},
    session::{AuthSession, Role},
};
use crate::config::BootstrapAdmin;

/// Account lookups the authenticator needs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn admin(&self, username: &str) -> sqlx::Result<Option<Credential>>;
    async fn student(&self, username: &str) -> sqlx::Result<Option<Credential>>;
}

#[async_trait]
impl CredentialStore for PgPool {
    async fn admin(&self, username: &str) -> sqlx::Result<Option<Credential>> {
        repo::admin_credential(self, username).await
    }

    async fn student(&self, username: &str) -> sqlx::Result<Option<Credential>> {
        repo::student_credential(self, username).await
    }
}

fn matches(cred: &Credential, password: &str) -> bool {
    password_matches(password, &cred.password_hash, &cred.username)
}

/// Checks the admin table first, then students. `None` means invalid
/// credentials without saying which part was wrong.
pub async fn authenticate<S>(
    store: &S,
    username: &str,
    password: &str,
) -> sqlx::Result<Option<AuthSession>>
where
    S: CredentialStore + ?Sized,
{
    if let Some(cred) = store.admin(username).await? {
        if matches(&cred, password) {
            return Ok(Some(AuthSession::new(Role::Admin, cred.id, cred.username)));
        }
        debug!("admin password mismatch, trying students");
    }

    if let Some(cred) = store.student(username).await? {
        if matches(&cred, password) {
            return Ok(Some(AuthSession::new(Role::Student, cred.id, cred.username)));
        }
    }

    Ok(None)
}

pub async fn ensure_admin(db: &PgPool, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    if Admin::find_by_username(db, &admin.username).await?.is_some() {
        return Ok(());
    }
    let hash = hash_password(&admin.password)?;
    let created = Admin::create(db, &admin.username, &hash).await?;
    info!(admin_id = created.admin_id, username = %created.username, "bootstrap admin created");
    Ok(())
}
