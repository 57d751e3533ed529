use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{CreateMealRequest, UpdateMealRequest};
use super::repo::{Meal, MealPatch};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/user", get(list_own_meals))
        .route("/:id", get(get_meal).patch(update_meal).delete(delete_meal))
}

#[instrument(skip(state, _user))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<Meal>>, ApiError> {
    let meals = Meal::list_all(&state.db).await?;
    Ok(Json(meals))
}

#[instrument(skip(state, user))]
pub async fn list_own_meals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Meal>>, ApiError> {
    let meals = Meal::list_by_owner(&state.db, user.id).await?;
    Ok(Json(meals))
}

#[instrument(skip(state, _user))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Meal>, ApiError> {
    let meal = Meal::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Meal"))?;
    Ok(Json(meal))
}

#[instrument(skip(state, user, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Meal>), ApiError> {
    let day = payload.day.ok_or(ApiError::MissingField("day"))?;
    let recipe_id = payload
        .recipe_id
        .ok_or(ApiError::MissingField("recipe_id"))?;

    let meal = Meal::insert(&state.db, &day, recipe_id, user.id).await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), meal.id);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::try_from(location).map_err(anyhow::Error::from)?,
    );

    info!(meal_id = meal.id, user_id = user.id, "meal created");
    Ok((StatusCode::CREATED, headers, Json(meal)))
}

#[instrument(skip(state, _user, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "Request body must contain either 'day' or 'recipe_id'".into(),
        ));
    }

    let patch = MealPatch {
        day: payload.day,
        recipe_id: payload.recipe_id,
    };

    let affected = Meal::update_by_id(&state.db, id, &patch).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Meal"));
    }
    info!(meal_id = id, "meal updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, _user))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let affected = Meal::delete_by_id(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Meal"));
    }
    info!(meal_id = id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}
