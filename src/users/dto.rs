use serde::{Deserialize, Serialize};

use super::repo::User;
use crate::meals::repo::Meal;
use crate::recipes::dto::RecipeResponse;

/// Request body for registration. `firstname` and `lastname` are optional.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

/// Partial update for a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.firstname.is_none()
            && self.lastname.is_none()
            && self.password.is_none()
    }
}

/// User detail with owned recipes and meals attached.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    #[serde(flatten)]
    pub user: User,
    pub recipes: Vec<RecipeResponse>,
    pub meals: Vec<Meal>,
}
