use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::error::{conflict_on_violation, AppError, AppResult};

use super::dto::StudentForm;
use super::repo_types::Student;

const DUPLICATE: &str = "Username or email already exists.";

pub async fn create_student(db: &PgPool, form: StudentForm) -> AppResult<i32> {
    let input = form.validate()?;
    let Some(password) = input.password.as_deref() else {
        return Err(AppError::validation("Password is required."));
    };
    let hash = hash_password(password)?;

    let id = Student::create(db, &input, &hash).await.map_err(|e| {
        let err = conflict_on_violation(e, DUPLICATE);
        if matches!(err, AppError::Conflict(_)) {
            warn!(username = %input.username, "duplicate student");
        }
        err
    })?;
    info!(student_id = id, username = %input.username, "student created");
    Ok(id)
}

pub async fn update_student(db: &PgPool, student_id: i32, form: StudentForm) -> AppResult<()> {
    let input = form.validate()?;
    let hash = input.password.as_deref().map(hash_password).transpose()?;

    let touched = Student::update(db, student_id, &input, hash.as_deref())
        .await
        .map_err(|e| conflict_on_violation(e, DUPLICATE))?;
    if touched == 0 {
        return Err(AppError::NotFound("Student not found.".into()));
    }
    info!(student_id, password_changed = hash.is_some(), "student updated");
    Ok(())
}

pub async fn delete_student(db: &PgPool, student_id: i32) -> AppResult<()> {
    if Student::delete(db, student_id).await? == 0 {
        return Err(AppError::NotFound("Student not found.".into()));
    }
    info!(student_id, "student deleted");
    Ok(())
}
