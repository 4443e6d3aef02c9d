use crate::auth::repo_types::{Admin, Credential};
use sqlx::PgPool;

impl Admin {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<Admin>> {
        sqlx::query_as::<_, Admin>(
            r#"
            SELECT admin_id, username, password_hash
            FROM admin
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn create(db: &PgPool, username: &str, password_hash: &str) -> sqlx::Result<Admin> {
        sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admin (username, password_hash)
            VALUES ($1, $2)
            RETURNING admin_id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }
}

pub async fn admin_credential(db: &PgPool, username: &str) -> sqlx::Result<Option<Credential>> {
    sqlx::query_as::<_, Credential>(
        r#"SELECT admin_id AS id, username, password_hash FROM admin WHERE username = $1"#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn student_credential(db: &PgPool, username: &str) -> sqlx::Result<Option<Credential>> {
    sqlx::query_as::<_, Credential>(
        r#"SELECT student_id AS id, username, password_hash FROM students WHERE username = $1"#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}
