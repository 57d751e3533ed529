use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{CreateRecipeRequest, RecipeResponse, UpdateRecipeRequest};
use super::repo::{NewRecipe, Recipe, RecipePatch};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/user", get(list_own_recipes))
        .route(
            "/:id",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state, _user))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = Recipe::list_all(&state.db).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

#[instrument(skip(state, user))]
pub async fn list_own_recipes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let recipes = Recipe::list_by_owner(&state.db, user.id).await?;
    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// Raw lookup by id; the one recipe route that takes no bearer token.
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = Recipe::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;
    Ok(Json(RecipeResponse::from(recipe)))
}

#[instrument(skip(state, user, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    OriginalUri(uri): OriginalUri,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, HeaderMap, Json<RecipeResponse>), ApiError> {
    let title = payload.title.ok_or(ApiError::MissingField("title"))?;
    let ingredients = payload
        .ingredients
        .ok_or(ApiError::MissingField("ingredients"))?;
    let instructions = payload
        .instructions
        .ok_or(ApiError::MissingField("instructions"))?;
    let meal_type = payload
        .meal_type
        .ok_or(ApiError::MissingField("meal_type"))?;
    let image_url = payload
        .image_url
        .ok_or(ApiError::MissingField("image_url"))?;

    let recipe = Recipe::insert(
        &state.db,
        &NewRecipe {
            title: &title,
            ingredients: &ingredients,
            instructions: &instructions,
            meal_type: &meal_type,
            image_url: &image_url,
            user_id: user.id,
        },
    )
    .await?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), recipe.id);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::try_from(location).map_err(anyhow::Error::from)?,
    );

    info!(recipe_id = recipe.id, user_id = user.id, "recipe created");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(RecipeResponse::from(recipe)),
    ))
}

#[instrument(skip(state, _user, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> Result<StatusCode, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation(
            "Request body must contain either 'title', 'ingredients', 'instructions', 'meal_type', or 'image_url'"
                .into(),
        ));
    }

    let patch = RecipePatch {
        title: payload.title,
        ingredients: payload.ingredients,
        instructions: payload.instructions,
        meal_type: payload.meal_type,
        image_url: payload.image_url,
    };

    let affected = Recipe::update_by_id(&state.db, id, &patch).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Recipe"));
    }
    info!(recipe_id = id, "recipe updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, _user))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let affected = Recipe::delete_by_id(&state.db, id).await?;
    if affected == 0 {
        return Err(ApiError::NotFound("Recipe"));
    }
    info!(recipe_id = id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
