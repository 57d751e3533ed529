use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// One recipe assigned to one day for one user. Duplicate assignments are
/// allowed; there is no uniqueness constraint across (user, day, recipe).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: i32,
    pub day: String,
    pub recipe_id: i32,
    pub user_id: i32,
}

/// Partial update; `None` fields keep their stored values.
#[derive(Debug, Default)]
pub struct MealPatch {
    pub day: Option<String>,
    pub recipe_id: Option<i32>,
}

impl Meal {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, day, recipe_id, user_id
            FROM meals
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, day, recipe_id, user_id
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn list_by_owner(db: &PgPool, user_id: i32) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, day, recipe_id, user_id
            FROM meals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn insert(
        db: &PgPool,
        day: &str,
        recipe_id: i32,
        user_id: i32,
    ) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (day, recipe_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, day, recipe_id, user_id
            "#,
        )
        .bind(day)
        .bind(recipe_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn update_by_id(db: &PgPool, id: i32, patch: &MealPatch) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE meals
            SET day = COALESCE($2, day),
                recipe_id = COALESCE($3, recipe_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.day.as_deref())
        .bind(patch.recipe_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(db: &PgPool, id: i32) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM meals WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_serializes_to_its_four_fields() {
        let meal = Meal {
            id: 2,
            day: "Tuesday".into(),
            recipe_id: 2,
            user_id: 1,
        };
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 2, "day": "Tuesday", "recipe_id": 2, "user_id": 1 })
        );
    }
}
