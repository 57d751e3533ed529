use serde::{Deserialize, Serialize};

/// Request body for login. Fields are optional so a missing one can be
/// reported by name instead of failing JSON deserialization.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response returned after login or registration.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken")]
    pub auth_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_uses_camel_case_key() {
        let response = AuthResponse {
            auth_token: "abc.def.ghi".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["authToken"], "abc.def.ghi");
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let parsed: LoginRequest = serde_json::from_str(r#"{"username":"janedoe"}"#).unwrap();
        assert_eq!(parsed.username.as_deref(), Some("janedoe"));
        assert!(parsed.password.is_none());
    }
}
