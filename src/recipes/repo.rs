use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// Recipe record in the database. Free-text fields are stored raw; cleaning
/// happens when they are serialized for a response.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
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

/// Insert payload; the owner always comes from the authenticated identity.
#[derive(Debug)]
pub struct NewRecipe<'a> {
    pub title: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
    pub meal_type: &'a str,
    pub image_url: &'a str,
    pub user_id: i32,
}

/// Partial update; `None` fields keep their stored values.
#[derive(Debug, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub meal_type: Option<String>,
    pub image_url: Option<String>,
}

impl Recipe {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, ingredients, instructions, meal_type, image_url,
                   date_created, user_id
            FROM recipes
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(recipes)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, ingredients, instructions, meal_type, image_url,
                   date_created, user_id
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(recipe)
    }

    pub async fn list_by_owner(db: &PgPool, user_id: i32) -> anyhow::Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, ingredients, instructions, meal_type, image_url,
                   date_created, user_id
            FROM recipes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(recipes)
    }

    pub async fn insert(db: &PgPool, new: &NewRecipe<'_>) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, ingredients, instructions, meal_type, image_url, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, ingredients, instructions, meal_type, image_url,
                      date_created, user_id
            "#,
        )
        .bind(new.title)
        .bind(new.ingredients)
        .bind(new.instructions)
        .bind(new.meal_type)
        .bind(new.image_url)
        .bind(new.user_id)
        .fetch_one(db)
        .await?;
        Ok(recipe)
    }

    pub async fn update_by_id(db: &PgPool, id: i32, patch: &RecipePatch) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET title = COALESCE($2, title),
                ingredients = COALESCE($3, ingredients),
                instructions = COALESCE($4, instructions),
                meal_type = COALESCE($5, meal_type),
                image_url = COALESCE($6, image_url)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.ingredients.as_deref())
        .bind(patch.instructions.as_deref())
        .bind(patch.meal_type.as_deref())
        .bind(patch.image_url.as_deref())
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(db: &PgPool, id: i32) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM recipes WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
