use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState, users::repo::User};

use super::dto::{AuthResponse, LoginRequest};
use super::jwt::JwtKeys;
use super::password::verify_password;

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let username = payload.username.ok_or(ApiError::MissingField("username"))?;
    let password = payload.password.ok_or(ApiError::MissingField("password"))?;

    // Unknown username and wrong password produce the same error so the
    // response does not reveal which half was wrong.
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| {
            warn!(%username, "login with unknown username");
            ApiError::IncorrectCredentials
        })?;

    if !verify_password(&password, &user.password)? {
        warn!(%username, user_id = user.id, "login with wrong password");
        return Err(ApiError::IncorrectCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let auth_token = keys.sign(&user.username, user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse { auth_token }))
}
