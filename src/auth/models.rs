//! Authentication Models

use serde::{Deserialize, Serialize};

/// User account row. The bcrypt hash never leaves the process.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64, // user id
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Identity attached to the request after the auth gate has resolved the
/// token to a live user row. Serialized shape matches the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl Identity {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serializes_camel_case() {
        let identity = Identity {
            id: 7,
            username: "alice".to_string(),
            is_admin: true,
        };

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_change_password_request_field_names() {
        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword":"a","newPassword":"b"}"#).unwrap();
        assert_eq!(req.old_password.as_deref(), Some("a"));
        assert_eq!(req.new_password.as_deref(), Some("b"));
    }
}
