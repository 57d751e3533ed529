use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::meals::repo::Meal;
use crate::recipes::repo::Recipe;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
}

/// Partial update; `None` fields keep their stored values.
#[derive(Debug, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
}

impl User {
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, firstname, lastname, password, date_created
            FROM users
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, firstname, lastname, password, date_created
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Single lookup used by login, registration uniqueness checks and the
    /// bearer-token subject resolution.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, firstname, lastname, password, date_created
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user; `password` is already hashed by the caller.
    pub async fn insert(
        db: &PgPool,
        username: &str,
        password: &str,
        firstname: Option<&str>,
        lastname: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, firstname, lastname)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, firstname, lastname, password, date_created
            "#,
        )
        .bind(username)
        .bind(password)
        .bind(firstname)
        .bind(lastname)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_by_id(db: &PgPool, id: i32, patch: &UserPatch) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                firstname = COALESCE($3, firstname),
                lastname = COALESCE($4, lastname),
                password = COALESCE($5, password)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.username.as_deref())
        .bind(patch.firstname.as_deref())
        .bind(patch.lastname.as_deref())
        .bind(patch.password.as_deref())
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(db: &PgPool, id: i32) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// The user plus everything they own. The three queries run concurrently.
    pub async fn find_with_related(
        db: &PgPool,
        id: i32,
    ) -> anyhow::Result<Option<(User, Vec<Recipe>, Vec<Meal>)>> {
        let (user, recipes, meals) = tokio::try_join!(
            User::find_by_id(db, id),
            Recipe::list_by_owner(db, id),
            Meal::list_by_owner(db, id),
        )?;
        Ok(user.map(|user| (user, recipes, meals)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn password_is_never_serialized() {
        let user = User {
            id: 1,
            username: "janedoe".into(),
            firstname: Some("Jane".into()),
            lastname: Some("Doe".into()),
            password: "$2b$12$secret-hash".into(),
            date_created: datetime!(2020-01-22 16:28:32 UTC),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "janedoe");
        assert_eq!(json["date_created"], "2020-01-22T16:28:32Z");
    }
}
