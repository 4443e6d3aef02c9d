use serde::Deserialize;

use crate::error::AppResult;
use crate::forms;

#[derive(Debug, Deserialize)]
pub struct CourseForm {
    pub course_id: String,
    pub course_name: String,
    pub credits: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseInput {
    pub course_id: String,
    pub course_name: String,
    pub credits: i32,
}

impl CourseForm {
    pub fn validate(self) -> AppResult<CourseInput> {
        let credits: i32 = forms::number("credits", &self.credits)?;
        if credits < 0 {
            return Err(crate::error::AppError::validation("Invalid credits value."));
        }
        Ok(CourseInput {
            course_id: forms::required("Course ID", &self.course_id)?,
            course_name: forms::required("Course name", &self.course_name)?,
            credits,
        })
    }
}

/// Enroll a student in a course.
#[derive(Debug, Deserialize)]
pub struct AssignForm {
    pub student_id: String,
    pub course_id: String,
}

impl AssignForm {
    pub fn validate(self) -> AppResult<(i32, String)> {
        Ok((
            forms::number("student id", &self.student_id)?,
            forms::required("Course ID", &self.course_id)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_form_parses_credits() {
        let input = CourseForm {
            course_id: " CS101 ".into(),
            course_name: "Intro to CS".into(),
            credits: "4".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(input.course_id, "CS101");
        assert_eq!(input.credits, 4);
    }

    #[test]
    fn course_form_rejects_bad_credits() {
        for credits in ["four", "-1", ""] {
            let err = CourseForm {
                course_id: "CS101".into(),
                course_name: "Intro".into(),
                credits: credits.into(),
            }
            .validate()
            .unwrap_err();
            assert_eq!(err.to_string(), "Invalid credits value.");
        }
    }

    #[test]
    fn assign_form_needs_numeric_student() {
        assert!(AssignForm {
            student_id: "abc".into(),
            course_id: "CS101".into()
        }
        .validate()
        .is_err());
    }
}
