use axum::{
    extract::{Query, State},
    routing::get,
    Form, Json, Router,
};
use tower_sessions::Session;
use tracing::{error, instrument};

use crate::{
    auth::RequireAdmin,
    courses::repo_types::Course,
    flash::{self, FlashLevel},
    forms,
    state::AppState,
};

use super::{
    dto::{AttendanceMark, AttendancePage, AttendanceQuery, AttendanceSubmission},
    reconcile::{current_state, reconcile},
};

pub fn attendance_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/mark_attendance",
        get(attendance_form).post(mark_attendance),
    )
}

/// Builds the page; roster and rows are loaded only when both course and date are set.
async fn page(
    state: &AppState,
    session: &Session,
    course_id: &str,
    date: Option<time::Date>,
) -> AttendancePage {
    let mut view = AttendancePage::default();

    match Course::list_all(&state.db).await {
        Ok(courses) => view.courses = courses,
        Err(e) => {
            error!(error = %e, "course list failed");
            flash::push(session, FlashLevel::Danger, "Could not load courses.").await;
        }
    }

    if let (false, Some(date)) = (course_id.is_empty(), date) {
        view.selected_course = course_id.to_string();
        view.selected_date = date.to_string();
        match current_state(&state.db, course_id, date).await {
            Ok((students, rows)) => {
                view.students = students;
                view.existing_attendance = rows
                    .into_values()
                    .map(|r| {
                        (
                            r.student_id,
                            AttendanceMark {
                                status: r.status,
                                notes: r.notes,
                            },
                        )
                    })
                    .collect();
            }
            Err(e) => {
                error!(error = %e, course_id, "attendance load failed");
                flash::push(session, FlashLevel::Danger, "Could not load attendance.").await;
            }
        }
    }

    view.flashes = flash::take(session).await;
    view
}

#[instrument(skip(state, guard))]
pub async fn attendance_form(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Query(q): Query<AttendanceQuery>,
) -> Json<AttendancePage> {
    let course_id = q.course_id.unwrap_or_default().trim().to_string();
    let date = match q.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => match forms::date("date", raw) {
            Ok(d) => Some(d),
            Err(e) => {
                flash::push(&guard.session, e.flash_level(), e.user_message()).await;
                None
            }
        },
        None => None,
    };
    Json(page(&state, &guard.session, &course_id, date).await)
}

#[instrument(skip_all)]
pub async fn mark_attendance(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Json<AttendancePage> {
    let session = &guard.session;

    let sub = match AttendanceSubmission::from_pairs(pairs) {
        Ok(Some(sub)) => sub,
        Ok(None) => {
            flash::push(session, FlashLevel::Warning, "Please select a course and a date.").await;
            return Json(page(&state, session, "", None).await);
        }
        Err(e) => {
            flash::push(session, e.flash_level(), e.user_message()).await;
            return Json(page(&state, session, "", None).await);
        }
    };

    let outcome = reconcile(&state.db, &sub).await;
    let success = format!(
        "Attendance marked successfully for course {} on {}.",
        sub.course_id, sub.date
    );
    flash::report(session, &outcome, &success).await;

    Json(page(&state, session, &sub.course_id, Some(sub.date)).await)
}
