use sqlx::PgPool;
use tracing::info;

use crate::error::{conflict_on_violation, AppResult};

use super::dto::{AssignForm, CourseForm};
use super::repo;
use super::repo_types::Course;

pub async fn create_course(db: &PgPool, form: CourseForm) -> AppResult<()> {
    let input = form.validate()?;
    Course::create(db, &input)
        .await
        .map_err(|e| conflict_on_violation(e, "Course ID already exists."))?;
    info!(course_id = %input.course_id, "course created");
    Ok(())
}

pub async fn assign_course(db: &PgPool, form: AssignForm) -> AppResult<()> {
    let (student_id, course_id) = form.validate()?;
    repo::enroll(db, student_id, &course_id).await.map_err(|e| {
        conflict_on_violation(
            e,
            "Student is already enrolled in this course or does not exist.",
        )
    })?;
    info!(student_id, course_id = %course_id, "student enrolled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::test_support::{seed_course, seed_student, test_pool, unique};

    fn course(id: &str) -> CourseForm {
        CourseForm {
            course_id: id.into(),
            course_name: "Thermodynamics".into(),
            credits: "4".into(),
        }
    }

    fn assign(student_id: i32, course_id: &str) -> AssignForm {
        AssignForm {
            student_id: student_id.to_string(),
            course_id: course_id.into(),
        }
    }

    #[tokio::test]
    async fn duplicate_course_id_is_a_conflict() {
        let Some(db) = test_pool().await else { return };
        let id = unique().to_uppercase();
        create_course(&db, course(&id)).await.unwrap();

        let err = create_course(&db, course(&id)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Course ID already exists."));
    }

    #[tokio::test]
    async fn repeated_or_dangling_enrollment_is_a_conflict() {
        let Some(db) = test_pool().await else { return };
        let course_id = seed_course(&db).await;
        let student = seed_student(&db).await;

        assign_course(&db, assign(student, &course_id)).await.unwrap();

        let err = assign_course(&db, assign(student, &course_id)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = assign_course(&db, assign(i32::MAX, &course_id)).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = assign_course(&db, assign(student, "NO-SUCH-COURSE")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
