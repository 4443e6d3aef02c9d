use axum::{extract::State, response::Redirect, routing::post, Form, Router};
use tracing::instrument;

use crate::{auth::RequireAdmin, flash, state::AppState};

use super::{
    dto::{AssignForm, CourseForm},
    services,
};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/add_course", post(add_course))
        .route("/assign_course", post(assign_course))
}

#[instrument(skip_all)]
pub async fn add_course(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Form(form): Form<CourseForm>,
) -> Redirect {
    let outcome = services::create_course(&state.db, form).await;
    flash::report(&guard.session, &outcome, "Course added successfully!").await;
    Redirect::to("/admin/dashboard")
}

#[instrument(skip_all)]
pub async fn assign_course(
    State(state): State<AppState>,
    guard: RequireAdmin,
    Form(form): Form<AssignForm>,
) -> Redirect {
    let outcome = services::assign_course(&state.db, form).await;
    flash::report(&guard.session, &outcome, "Course assigned successfully!").await;
    Redirect::to("/admin/dashboard")
}
