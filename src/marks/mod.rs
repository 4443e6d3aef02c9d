//! Marks: one score per enrollment, insert-only.

use axum::{extract::State, response::Redirect, routing::post, Form, Router};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::{
    auth::RequireAdmin,
    error::{AppError, AppResult},
    flash, forms,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/add_marks", post(add_marks_handler))
}

#[derive(Debug, Deserialize)]
pub struct MarksForm {
    pub student_id: String,
    pub course_id: String,
    pub marks: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkInput {
    pub student_id: i32,
    pub course_id: String,
    pub marks: f64,
}

impl MarksForm {
    pub fn validate(self) -> AppResult<MarkInput> {
        let marks: f64 = forms::number("marks", &self.marks)?;
        if !marks.is_finite() {
            return Err(AppError::validation("Invalid marks value."));
        }
        Ok(MarkInput {
            student_id: forms::number("student id", &self.student_id)?,
            course_id: forms::required("Course ID", &self.course_id)?,
            marks,
        })
    }
}

pub async fn insert_mark(db: &PgPool, mark: &MarkInput) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO marks (student_id, course_id, marks)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(mark.student_id)
    .bind(&mark.course_id)
    .bind(mark.marks)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn add_marks(db: &PgPool, form: MarksForm) -> AppResult<()> {
    let mark = form.validate()?;
    if let Err(e) = insert_mark(db, &mark).await {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                warn!(student_id = mark.student_id, course_id = %mark.course_id, "duplicate marks");
                return Err(AppError::Conflict(
                    "Marks for this student-course already exist.".into(),
                ));
            }
            if db_err.is_foreign_key_violation() {
                return Err(AppError::Conflict(
                    "Student is not enrolled in this course.".into(),
                ));
            }
        }
        return Err(e.into());
    }
    info!(student_id = mark.student_id, course_id = %mark.course_id, "marks recorded");
    Ok(())
}

#[instrument(skip_all)]
async fn add_marks_handler(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Form(form): Form<MarksForm>,
) -> Redirect {
    let outcome = add_marks(&state.db, form).await;
    flash::report(&guard.session, &outcome, "Marks added successfully!").await;
    Redirect::to("/admin/dashboard")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_course, seed_student, test_pool};

    fn form(student_id: &str, course_id: &str, marks: &str) -> MarksForm {
        MarksForm {
            student_id: student_id.into(),
            course_id: course_id.into(),
            marks: marks.into(),
        }
    }

    #[test]
    fn marks_must_be_finite_numbers() {
        for bad in ["ninety", "NaN", "inf", ""] {
            let err = form("1", "CS101", bad).validate().unwrap_err();
            assert_eq!(err.to_string(), "Invalid marks value.");
        }
        assert_eq!(form("1", "CS101", "88.5").validate().unwrap().marks, 88.5);
    }

    #[tokio::test]
    async fn second_mark_for_same_pair_is_a_conflict() {
        let Some(db) = test_pool().await else { return };
        let course = seed_course(&db).await;
        let student = seed_student(&db).await;
        crate::courses::repo::enroll(&db, student, &course).await.unwrap();

        let sid = student.to_string();
        add_marks(&db, form(&sid, &course, "71")).await.unwrap();
        let err = add_marks(&db, form(&sid, &course, "90")).await.unwrap_err();
        assert_eq!(err.to_string(), "Marks for this student-course already exist.");
    }

    #[tokio::test]
    async fn mark_without_enrollment_is_rejected() {
        let Some(db) = test_pool().await else { return };
        let course = seed_course(&db).await;
        let student = seed_student(&db).await;

        let err = add_marks(&db, form(&student.to_string(), &course, "50"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
