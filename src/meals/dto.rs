use serde::Deserialize;

/// Request body for assigning a recipe to a day. The owner is never read
/// from the body; it comes from the bearer token.
#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub day: Option<String>,
    pub recipe_id: Option<i32>,
}

/// Partial update for a meal.
#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub day: Option<String>,
    pub recipe_id: Option<i32>,
}

impl UpdateMealRequest {
    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.recipe_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_ignores_client_supplied_owner() {
        let parsed: CreateMealRequest =
            serde_json::from_str(r#"{"day":"Saturday","recipe_id":1,"user_id":99}"#).unwrap();
        assert_eq!(parsed.day.as_deref(), Some("Saturday"));
        assert_eq!(parsed.recipe_id, Some(1));
        // user_id has no field to land in
    }

    #[test]
    fn update_request_empty_check() {
        let empty: UpdateMealRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
        let with_day: UpdateMealRequest = serde_json::from_str(r#"{"day":"Friday"}"#).unwrap();
        assert!(!with_day.is_empty());
    }
}
