//! Standardized API response types (RFC 7807 compliant for errors).

use serde::{Deserialize, Serialize};

/// Single-resource envelope: `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain confirmation message: `{"message": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Page counters for a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub path: String,
}

/// Navigation links for a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl PaginationLinks {
    pub fn for_meta(meta: &PaginationMeta) -> Self {
        let url = |page: u64| format!("{}?page={}", meta.path, page);

        Self {
            first: url(1),
            last: url(meta.last_page),
            prev: (meta.current_page > 1).then(|| url(meta.current_page - 1)),
            next: (meta.current_page < meta.last_page).then(|| url(meta.current_page + 1)),
        }
    }
}

/// Paginated collection envelope: `{"data": [...], "links": {...}, "meta": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub links: PaginationLinks,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self {
            data,
            links: PaginationLinks::for_meta(&meta),
            meta,
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Individual validation failures.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            errors: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common error constructors
    pub fn unauthenticated() -> Self {
        Self::new(401, "Unauthorized").with_detail("Unauthenticated.")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden").with_detail("This action is unauthorized.")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn validation(errors: Vec<String>) -> Self {
        let mut response =
            Self::new(422, "Unprocessable Entity").with_detail("The given data was invalid.");
        response.errors = errors;
        response
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(current_page: u64, last_page: u64) -> PaginationMeta {
        PaginationMeta {
            current_page,
            from: None,
            to: None,
            last_page,
            per_page: 20,
            total: 0,
            path: "/api/posts".to_string(),
        }
    }

    #[test]
    fn test_links_in_middle_page() {
        let links = PaginationLinks::for_meta(&meta(2, 3));
        assert_eq!(links.first, "/api/posts?page=1");
        assert_eq!(links.last, "/api/posts?page=3");
        assert_eq!(links.prev.as_deref(), Some("/api/posts?page=1"));
        assert_eq!(links.next.as_deref(), Some("/api/posts?page=3"));
    }

    #[test]
    fn test_links_on_single_page() {
        let links = PaginationLinks::for_meta(&meta(1, 1));
        assert!(links.prev.is_none());
        assert!(links.next.is_none());
    }

    #[test]
    fn test_validation_body_lists_errors() {
        let body = serde_json::to_value(ErrorResponse::validation(vec![
            "The title field is required.".to_string(),
        ]))
        .unwrap();
        assert_eq!(body["status"], 422);
        assert_eq!(body["errors"][0], "The title field is required.");
    }
}
