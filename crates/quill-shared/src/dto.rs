//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Longest accepted post title, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserRequest {
    /// Field-level validation messages; empty when the request is acceptable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("The name field is required.".to_string());
        }
        if self.email.is_empty() || !self.email.contains('@') {
            errors.push("The email field must be a valid email address.".to_string());
        }
        if self.password.len() < 8 {
            errors.push("The password field must be at least 8 characters.".to_string());
        }
        errors
    }
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request to create a post.
///
/// Required fields are optional here so that a missing field is reported as a
/// validation error rather than a malformed body. Any owner field a client
/// sends is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        match self.title.as_deref() {
            None => errors.push("The title field is required.".to_string()),
            Some(title) => check_title(title, &mut errors),
        }
        match self.content.as_deref() {
            None => errors.push("The content field is required.".to_string()),
            Some(content) => check_content(content, &mut errors),
        }
        errors
    }
}

/// Request to update a post. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_draft: Option<bool>,
    /// Absent: unchanged. `null`: cleared. Timestamp: set.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(title) = self.title.as_deref() {
            check_title(title, &mut errors);
        }
        if let Some(content) = self.content.as_deref() {
            check_content(content, &mut errors);
        }
        errors
    }
}

fn check_title(title: &str, errors: &mut Vec<String>) {
    if title.trim().is_empty() {
        errors.push("The title field is required.".to_string());
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.push(format!(
            "The title field must not be greater than {MAX_TITLE_LEN} characters."
        ));
    }
}

fn check_content(content: &str, errors: &mut Vec<String>) {
    if content.trim().is_empty() {
        errors.push("The content field is required.".to_string());
    }
}

/// Distinguishes an explicit `null` from a missing field.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Summary of a post's author, embedded in post responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: Option<OwnerSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title_and_content() {
        let errors = CreatePostRequest::default().validate();
        assert_eq!(errors.len(), 2);

        let ok = CreatePostRequest {
            title: Some("Title".to_string()),
            content: Some("Body".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn test_title_length_limit() {
        let req = CreatePostRequest {
            title: Some("x".repeat(MAX_TITLE_LEN + 1)),
            content: Some("Body".to_string()),
            ..Default::default()
        };
        assert_eq!(req.validate().len(), 1);
    }

    #[test]
    fn test_create_ignores_client_owner() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title":"T","content":"C","user_id":"3f2504e0-4f89-11d3-9a0c-0305e82c3301"}"#,
        )
        .unwrap();
        assert!(req.validate().is_empty());
        assert!(!req.is_draft);
    }

    #[test]
    fn test_update_published_at_tri_state() {
        let absent: UpdatePostRequest = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        let cleared: UpdatePostRequest = serde_json::from_str(r#"{"published_at":null}"#).unwrap();
        let set: UpdatePostRequest =
            serde_json::from_str(r#"{"published_at":"2024-05-01T10:00:00Z"}"#).unwrap();

        assert_eq!(absent.published_at, None);
        assert_eq!(cleared.published_at, Some(None));
        assert!(matches!(set.published_at, Some(Some(_))));
    }

    #[test]
    fn test_update_rejects_blank_fields() {
        let req = UpdatePostRequest {
            title: Some("  ".to_string()),
            content: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(req.validate().len(), 2);
        assert!(UpdatePostRequest::default().validate().is_empty());
    }
}
