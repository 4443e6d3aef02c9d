//! Helpers for tests that need a real database.
//!
//! Those tests run against `TEST_DATABASE_URL` and return early when it is unset.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::courses::{dto::CourseInput, repo_types::Course};
use crate::students::{dto::StudentInput, repo_types::Student};

pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("apply migrations");
    Some(db)
}

/// Short random tag for usernames and course ids.
pub fn unique() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("t{}", &id[..12])
}

pub async fn seed_course(db: &PgPool) -> String {
    let input = CourseInput {
        course_id: unique().to_uppercase(),
        course_name: "Seeded course".into(),
        credits: 3,
    };
    Course::create(db, &input).await.expect("seed course");
    input.course_id
}

pub async fn seed_student(db: &PgPool) -> i32 {
    let tag = unique();
    let input = StudentInput {
        username: tag.clone(),
        password: None,
        name: format!("Seeded {tag}"),
        dob: time::macros::date!(2003 - 03 - 03),
        department: "Seeding".into(),
        year: 1,
        email: format!("{tag}@seed.test"),
        phone: String::new(),
    };
    Student::create(db, &input, "not-a-real-hash")
        .await
        .expect("seed student")
}
