//! Account profile.

use axum::{Json, extract::State};
use serde::Deserialize;

use homestyle_core::{UserProfile, UserUpdate};

use super::extract::ApiJson;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Editable profile fields. Username and email are not editable here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl From<ProfileForm> for UserUpdate {
    fn from(form: ProfileForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
            address: form.address,
            city: form.city,
            state: form.state,
            zip_code: form.zip_code,
            ..Self::default()
        }
    }
}

/// `GET /api/profile` (also served as `GET /api/user`)
pub async fn show(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>> {
    state
        .storage()
        .get_user(user.id)
        .await?
        .map(|u| Json(UserProfile::from(u)))
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// `PUT /api/profile`
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ProfileForm>,
) -> Result<Json<UserProfile>> {
    let updated = state
        .storage()
        .update_user(user.id, form.into())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(Json(updated.into()))
}
