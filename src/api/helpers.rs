//! API response helpers

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::errors::SubtrackError;

use super::types::ErrorBody;

/// JSON response with an explicit status
pub fn json_response<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 200 OK + JSON
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, data)
}

/// 201 Created + JSON
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, data)
}

/// Error response with the `{"error": ...}` body shape
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(
        status,
        ErrorBody {
            error: message.to_string(),
        },
    )
}

/// Map a `SubtrackError` onto its HTTP status and error body
pub fn error_from_subtrack(err: &SubtrackError) -> HttpResponse {
    error_response(err.http_status(), err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 SubtrackError。
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_subtrack(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success_response("data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_created_response() {
        let response = created_response(serde_json::json!({"id": "1"}));
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(StatusCode::NOT_FOUND, "Streamer not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_from_subtrack_maps_status() {
        let err = SubtrackError::validation("bad field");
        assert_eq!(error_from_subtrack(&err).status(), StatusCode::BAD_REQUEST);

        let err = SubtrackError::not_found("missing");
        assert_eq!(error_from_subtrack(&err).status(), StatusCode::NOT_FOUND);

        let err = SubtrackError::database_operation("boom");
        assert_eq!(
            error_from_subtrack(&err).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
