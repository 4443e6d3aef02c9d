use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Form, Json, Router,
};
use tower_sessions::Session;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, LoginPage},
        services::authenticate,
        session,
    },
    flash::{self, FlashLevel},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

#[instrument(skip(session))]
pub async fn login_page(session: Session) -> Json<LoginPage> {
    Json(LoginPage {
        flashes: flash::take(&session).await,
    })
}

#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Redirect {
    let username = form.username.trim();

    let auth = match authenticate(&state.db, username, &form.password).await {
        Ok(Some(auth)) => auth,
        Ok(None) => {
            warn!("login invalid credentials");
            flash::push(&session, FlashLevel::Danger, "Invalid username or password.").await;
            return Redirect::to("/login");
        }
        Err(e) => {
            error!(error = %e, "credential lookup failed");
            flash::push(&session, FlashLevel::Danger, "Login is unavailable right now.").await;
            return Redirect::to("/login");
        }
    };

    if let Err(e) = session::establish(&session, &auth).await {
        error!(error = %e, "session establish failed");
        flash::push(&session, FlashLevel::Danger, "Login is unavailable right now.").await;
        return Redirect::to("/login");
    }

    info!(user_id = auth.user_id, role = ?auth.role, "user logged in");
    let greeting = match auth.role {
        session::Role::Admin => "Admin login successful!",
        session::Role::Student => "Student login successful!",
    };
    flash::push(&session, FlashLevel::Success, greeting).await;
    Redirect::to(&auth.home())
}

#[instrument(skip(session))]
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = session::logout(&session).await {
        error!(error = %e, "session flush failed");
    }
    flash::push(&session, FlashLevel::Info, "You have been logged out.").await;
    Redirect::to("/login")
}
