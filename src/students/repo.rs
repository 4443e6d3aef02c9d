use sqlx::PgPool;

use super::dto::StudentInput;
use super::repo_types::{EnrolledCourse, Student};

const STUDENT_COLUMNS: &str =
    "student_id, username, password_hash, name, dob, department, year, email, phone";

impl Student {
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY name"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, student_id: i32) -> sqlx::Result<Option<Student>> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await
    }

    /// Insert with an already hashed password; returns the new id.
    pub async fn create(db: &PgPool, input: &StudentInput, password_hash: &str) -> sqlx::Result<i32> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO students (username, password_hash, name, dob, department, year, email, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING student_id
            "#,
        )
        .bind(&input.username)
        .bind(password_hash)
        .bind(&input.name)
        .bind(input.dob)
        .bind(&input.department)
        .bind(input.year)
        .bind(&input.email)
        .bind(&input.phone)
        .fetch_one(db)
        .await
    }

    /// Returns the number of rows touched (0 when the id is unknown).
    /// `password_hash = None` keeps the stored hash.
    pub async fn update(
        db: &PgPool,
        student_id: i32,
        input: &StudentInput,
        password_hash: Option<&str>,
    ) -> sqlx::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE students
            SET username = $1,
                password_hash = COALESCE($2, password_hash),
                name = $3,
                dob = $4,
                department = $5,
                year = $6,
                email = $7,
                phone = $8
            WHERE student_id = $9
            "#,
        )
        .bind(&input.username)
        .bind(password_hash)
        .bind(&input.name)
        .bind(input.dob)
        .bind(&input.department)
        .bind(input.year)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(student_id)
        .execute(db)
        .await?;
        Ok(done.rows_affected())
    }

    /// Enrollments, marks and attendance go with it (ON DELETE CASCADE).
    pub async fn delete(db: &PgPool, student_id: i32) -> sqlx::Result<u64> {
        let done = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(db)
            .await?;
        Ok(done.rows_affected())
    }

    #[cfg(test)]
    pub async fn count(db: &PgPool) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await
    }

    pub async fn enrollments(db: &PgPool, student_id: i32) -> sqlx::Result<Vec<EnrolledCourse>> {
        sqlx::query_as::<_, EnrolledCourse>(
            r#"
            SELECT c.course_id, c.course_name, c.credits, m.marks
            FROM student_courses sc
            JOIN courses c ON sc.course_id = c.course_id
            LEFT JOIN marks m ON sc.student_id = m.student_id AND sc.course_id = m.course_id
            WHERE sc.student_id = $1
            ORDER BY c.course_id
            "#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
    }
}
