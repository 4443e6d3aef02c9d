use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
}

/// Roster line for a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EnrolledStudent {
    pub student_id: i32,
    pub name: String,
    pub username: String,
}
