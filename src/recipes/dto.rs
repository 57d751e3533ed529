use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::Recipe;
use crate::sanitize;

/// Request body for creating a recipe. Every field is required; they are
/// checked one at a time so the first missing one is named in the error.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub meal_type: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update for a recipe.
#[derive(Debug, Deserialize)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub meal_type: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateRecipeRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
            && self.meal_type.is_none()
            && self.image_url.is_none()
    }
}

/// Recipe as returned to clients. Free-text fields are cleaned here, at
/// serialization time; the stored row stays raw.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub ingredients: String,
    pub instructions: String,
    pub meal_type: String,
    pub image_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    pub user_id: i32,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: sanitize::clean(&recipe.title),
            ingredients: sanitize::clean(&recipe.ingredients),
            instructions: sanitize::clean(&recipe.instructions),
            meal_type: sanitize::clean(&recipe.meal_type),
            image_url: sanitize::clean(&recipe.image_url),
            date_created: recipe.date_created,
            user_id: recipe.user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn malicious_recipe() -> Recipe {
        Recipe {
            id: 911,
            title: r#"Bad title <script>alert("xss");</script>"#.into(),
            ingredients: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.into(),
            instructions: r#"Bad image <img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">. But not <strong>all</strong> bad."#.into(),
            meal_type: "Breakfast".into(),
            image_url: "https://url.to.file.which/does-not.exist".into(),
            date_created: datetime!(2020-01-22 16:28:32 UTC),
            user_id: 2,
        }
    }

    #[test]
    fn response_neutralizes_embedded_markup() {
        let response = RecipeResponse::from(malicious_recipe());
        assert_eq!(
            response.title,
            r#"Bad title &lt;script&gt;alert("xss");&lt;/script&gt;"#
        );
        assert_eq!(
            response.ingredients,
            r#"Bad image <img src="https://url.to.file.which/does-not.exist">. But not <strong>all</strong> bad."#
        );
        assert_eq!(response.ingredients, response.instructions);
        assert_eq!(response.meal_type, "Breakfast");
        assert_eq!(response.image_url, "https://url.to.file.which/does-not.exist");
        assert_eq!(response.user_id, 2);
    }

    #[test]
    fn response_leaves_clean_fields_alone() {
        let recipe = Recipe {
            id: 1,
            title: "Egg Scramble".into(),
            ingredients: "eggs, salt, pepper".into(),
            instructions: "Whisk and cook.".into(),
            meal_type: "Breakfast".into(),
            image_url: "https://via.placeholder.com/100".into(),
            date_created: datetime!(2020-01-22 16:28:32 UTC),
            user_id: 1,
        };
        let response = RecipeResponse::from(recipe);
        assert_eq!(response.title, "Egg Scramble");
        assert_eq!(response.ingredients, "eggs, salt, pepper");
    }

    #[test]
    fn update_request_empty_check() {
        let empty: UpdateRecipeRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
        let with_title: UpdateRecipeRequest =
            serde_json::from_str(r#"{"title":"Salad"}"#).unwrap();
        assert!(!with_title.is_empty());
    }
}
