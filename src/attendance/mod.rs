pub mod dto;
pub mod handlers;
pub mod reconcile;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::attendance_routes()
}
