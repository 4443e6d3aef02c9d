use sqlx::{PgConnection, PgPool};
use time::Date;

use super::repo_types::{AttendanceRecord, AttendanceStatus};

impl AttendanceRecord {
    pub async fn list_for_student(db: &PgPool, student_id: i32) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT student_id, course_id, date, status, notes
            FROM attendance
            WHERE student_id = $1
            ORDER BY date DESC, course_id
            "#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
    }
}

/// Existing rows for (course, date), limited to `student_ids`.
pub async fn existing_for<'e, E>(
    db: E,
    course_id: &str,
    date: Date,
    student_ids: &[i32],
) -> sqlx::Result<Vec<AttendanceRecord>>
where
    E: sqlx::PgExecutor<'e>,
{
    if student_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT student_id, course_id, date, status, notes
        FROM attendance
        WHERE course_id = $1 AND date = $2 AND student_id = ANY($3)
        "#,
    )
    .bind(course_id)
    .bind(date)
    .bind(student_ids)
    .fetch_all(db)
    .await
}

pub async fn insert(
    conn: &mut PgConnection,
    student_id: i32,
    course_id: &str,
    date: Date,
    status: AttendanceStatus,
    notes: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO attendance (student_id, course_id, date, status, notes)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .bind(date)
    .bind(status)
    .bind(notes)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update(
    conn: &mut PgConnection,
    student_id: i32,
    course_id: &str,
    date: Date,
    status: AttendanceStatus,
    notes: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        UPDATE attendance
        SET status = $1, notes = $2
        WHERE student_id = $3 AND course_id = $4 AND date = $5
        "#,
    )
    .bind(status)
    .bind(notes)
    .bind(student_id)
    .bind(course_id)
    .bind(date)
    .execute(conn)
    .await?;
    Ok(())
}
