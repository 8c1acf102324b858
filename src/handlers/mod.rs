pub mod inventory;
pub mod transactions;

use axum::http::HeaderMap;

use crate::errors::ServiceError;

/// Header carrying the authenticated operator id, set by the upstream auth
/// collaborator. This service does not issue or verify credentials.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extracts the operator id stamped on the request by the auth layer.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<i64, ServiceError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ServiceError::ValidationError(format!("missing {} header", USER_ID_HEADER))
        })?;

    raw.parse::<i64>().map_err(|_| {
        ServiceError::ValidationError(format!("invalid {} header: {}", USER_ID_HEADER, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_valid_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("42"));
        assert_eq!(user_id_from_headers(&headers).unwrap(), 42);
    }

    #[test]
    fn rejects_missing_or_malformed_user_id() {
        let headers = HeaderMap::new();
        assert!(user_id_from_headers(&headers).is_err());

        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-number"));
        assert!(user_id_from_headers(&headers).is_err());
    }
}
