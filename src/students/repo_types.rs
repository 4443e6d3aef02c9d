use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Student record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub student_id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub dob: Date,
    pub department: String,
    pub year: i32,
    pub email: String,
    pub phone: String,
}

/// A course the student is enrolled in, with the mark if one was entered.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrolledCourse {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
    pub marks: Option<f64>,
}
