use sqlx::PgPool;

use super::dto::CourseInput;
use super::repo_types::{Course, EnrolledStudent};

impl Course {
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Course>> {
        sqlx::query_as::<_, Course>(
            "SELECT course_id, course_name, credits FROM courses ORDER BY course_id",
        )
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &PgPool, input: &CourseInput) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (course_id, course_name, credits)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&input.course_id)
        .bind(&input.course_name)
        .bind(input.credits)
        .execute(db)
        .await?;
        Ok(())
    }
}

pub async fn enroll(db: &PgPool, student_id: i32, course_id: &str) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO student_courses (student_id, course_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn enrolled_students<'e, E>(db: E, course_id: &str) -> sqlx::Result<Vec<EnrolledStudent>>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, EnrolledStudent>(
        r#"
        SELECT s.student_id, s.name, s.username
        FROM students s
        JOIN student_courses sc ON s.student_id = sc.student_id
        WHERE sc.course_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}
