use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::{error, instrument};

use crate::{
    attendance::repo_types::AttendanceRecord,
    auth::{session, RequireAdmin, RequireStudent},
    courses::repo_types::Course,
    flash::{self, FlashLevel},
    state::AppState,
};

use super::{
    dto::{AdminDashboard, StudentDashboard, StudentForm},
    repo_types::Student,
    services,
};

const LOAD_FAILED: &str = "Could not load dashboard.";

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/student/dashboard/:id", get(student_dashboard))
        .route("/add_student", post(add_student))
        .route("/edit_student/:id", post(edit_student))
        .route("/delete_student/:id", get(delete_student))
}

#[instrument(skip_all, fields(admin = %guard.auth.username))]
pub async fn admin_dashboard(State(state): State<AppState>, guard: RequireAdmin) -> Json<AdminDashboard> {
    let loaded = tokio::try_join!(Student::list_all(&state.db), Course::list_all(&state.db));
    let (students, courses) = match loaded {
        Ok(lists) => lists,
        Err(e) => {
            error!(error = %e, "admin dashboard load failed");
            flash::push(&guard.session, FlashLevel::Danger, LOAD_FAILED).await;
            (Vec::new(), Vec::new())
        }
    };
    Json(AdminDashboard {
        students,
        courses,
        flashes: flash::take(&guard.session).await,
    })
}

#[instrument(skip(state, guard))]
pub async fn student_dashboard(
    State(state): State<AppState>,
    guard: RequireStudent,
    Path(id): Path<i32>,
) -> Response {
    if let Err(redirect) = guard.owns(id).await {
        return redirect.into_response();
    }

    let student = match Student::find_by_id(&state.db, id).await {
        Ok(Some(s)) => s,
        Ok(None) => {
            // flush first so the message lands in the fresh session
            if let Err(e) = session::logout(&guard.session).await {
                error!(error = %e, student_id = id, "logout of removed account failed");
            }
            flash::push(&guard.session, FlashLevel::Danger, "Account no longer exists.").await;
            return Redirect::to("/login").into_response();
        }
        Err(e) => {
            error!(error = %e, student_id = id, "student lookup failed");
            flash::push(&guard.session, FlashLevel::Danger, LOAD_FAILED).await;
            return Redirect::to("/login").into_response();
        }
    };

    let loaded = tokio::try_join!(
        Student::enrollments(&state.db, id),
        AttendanceRecord::list_for_student(&state.db, id)
    );
    let (enrollments, attendance) = match loaded {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, student_id = id, "student dashboard load failed");
            flash::push(&guard.session, FlashLevel::Danger, LOAD_FAILED).await;
            (Vec::new(), Vec::new())
        }
    };
    Json(StudentDashboard {
        student,
        enrollments,
        attendance,
        flashes: flash::take(&guard.session).await,
    })
    .into_response()
}

#[instrument(skip_all)]
pub async fn add_student(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Form(form): Form<StudentForm>,
) -> Redirect {
    let outcome = services::create_student(&state.db, form).await;
    flash::report(&guard.session, &outcome, "Student added successfully!").await;
    Redirect::to("/admin/dashboard")
}

#[instrument(skip(state, guard, form))]
pub async fn edit_student(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Path(id): Path<i32>,
    Form(form): Form<StudentForm>,
) -> Redirect {
    let outcome = services::update_student(&state.db, id, form).await;
    flash::report(&guard.session, &outcome, "Student updated successfully!").await;
    Redirect::to("/admin/dashboard")
}

#[instrument(skip(state, guard))]
pub async fn delete_student(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Path(id): Path<i32>,
) -> Redirect {
    match services::delete_student(&state.db, id).await {
        Ok(()) => {
            flash::push(&guard.session, FlashLevel::Warning, "Student deleted successfully!").await
        }
        Err(e) => flash::push(&guard.session, e.flash_level(), e.user_message()).await,
    }
    Redirect::to("/admin/dashboard")
}
