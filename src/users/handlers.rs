use axum::{
    extract::{FromRef, OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::dto::AuthResponse,
    auth::jwt::JwtKeys,
    auth::password::{hash_password, validate_password},
    error::ApiError,
    recipes::dto::RecipeResponse,
    state::AppState,
};

use super::dto::{RegisterRequest, UpdateUserRequest, UserDetails};
use super::repo::{User, UserPatch};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    let username = payload.username.ok_or(ApiError::MissingField("username"))?;
    let password = payload.password.ok_or(ApiError::MissingField("password"))?;

    if let Some(message) = validate_password(&password) {
        warn!(%username, reason = message, "password rejected");
        return Err(ApiError::Validation(message.into()));
    }

    if User::find_by_username(&state.db, &username)
        .await?
        .is_some()
    {
        warn!(%username, "username already taken");
        return Err(ApiError::UsernameTaken);
    }

    // The deliberately slow step
    let hashed = hash_password(&password)?;

    let user = User::insert(
        &state.db,
        &username,
        &hashed,
        payload.firstname.as_deref(),
        payload.lastname.as_deref(),
    )
    .await?;

    let keys = JwtKeys::from_ref(&state);
    let auth_token = keys.sign(&user.username, user.id)?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), user.id);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::try_from(location).map_err(anyhow::Error::from)?,
    );

    info!(user_id = user.id, %username, "user registered");
    Ok((StatusCode::CREATED, headers, Json(AuthResponse { auth_token })))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserDetails>, ApiError> {
    let (user, recipes, meals) = User::find_with_related(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserDetails {
        user,
        recipes: recipes.into_iter().map(RecipeResponse::from).collect(),
        meals,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "Request body must contain either 'username', 'firstname', 'lastname', or 'password'"
                .into(),
        ));
    }

    // A replacement password goes through the same hashing as registration
    let password = match payload.password {
        Some(plain) => Some(hash_password(&plain)?),
        None => None,
    };
    let patch = UserPatch {
        username: payload.username,
        firstname: payload.firstname,
        lastname: payload.lastname,
        password,
    };

    let affected = User::update_by_id(&state.db, id, &patch).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = id, "user updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let affected = User::delete_by_id(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
