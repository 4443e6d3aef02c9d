use serde::{Deserialize, Serialize};
use time::Date;

use crate::attendance::repo_types::AttendanceRecord;
use crate::courses::repo_types::Course;
use crate::error::AppResult;
use crate::flash::Flash;
use crate::forms;

use super::repo_types::{EnrolledCourse, Student};

/// Add/edit student form, as submitted.
#[derive(Debug, Deserialize)]
pub struct StudentForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
    pub dob: String,
    pub department: String,
    pub year: String,
    pub email: String,
    pub phone: String,
}

/// Validated student fields. `password` is `None` when the form left it blank.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentInput {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub dob: Date,
    pub department: String,
    pub year: i32,
    pub email: String,
    pub phone: String,
}

impl StudentForm {
    pub fn validate(self) -> AppResult<StudentInput> {
        Ok(StudentInput {
            username: forms::required("Username", &self.username)?,
            password: Some(self.password).filter(|p| !p.is_empty()),
            name: forms::required("Name", &self.name)?,
            dob: forms::date("date of birth", &self.dob)?,
            department: self.department.trim().to_string(),
            year: forms::number("year", &self.year)?,
            email: forms::email(&self.email)?,
            phone: self.phone.trim().to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub student: Student,
    pub enrollments: Vec<EnrolledCourse>,
    pub attendance: Vec<AttendanceRecord>,
    pub flashes: Vec<Flash>,
}
