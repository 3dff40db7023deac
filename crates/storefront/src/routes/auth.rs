//! Authentication route handlers.
//!
//! Register, login and logout over JSON. A successful register or login
//! stores [`CurrentUser`] in the session and returns the profile.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use homestyle_core::{User, UserProfile};

use super::extract::ApiJson;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, &user.username);
    Ok(())
}

/// `POST /api/register`: create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<Registration>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let user = AuthService::new(state.storage()).register(form).await?;
    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(form): ApiJson<LoginForm>,
) -> Result<Json<UserProfile>> {
    let user = match AuthService::new(state.storage())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(username = %form.username, "Login failed: {e}");
            return Err(e.into());
        }
    };
    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(user.into()))
}

/// `POST /api/logout`: always succeeds for the client.
pub async fn logout(session: Session) -> Json<Value> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();
    Json(json!({ "success": true }))
}
