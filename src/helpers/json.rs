use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;

/// Every failure a client can see. The body is always `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Renders body deserialization failures through [`ApiError`].
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let msg = match &err {
        error::JsonPayloadError::Deserialize(err) => format!(
            "invalid request body at line {} column {}: {}",
            err.line(),
            err.column(),
            err
        ),
        other => other.to_string(),
    };
    tracing::debug!("rejecting request body: {}", msg);

    ApiError::validation(msg).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn renders_uniform_error_body() {
        let cases = [
            (ApiError::validation("password is required"), StatusCode::BAD_REQUEST),
            (ApiError::unauthorized("token expired"), StatusCode::UNAUTHORIZED),
            (ApiError::not_found("speaker not found"), StatusCode::NOT_FOUND),
            (ApiError::internal("failed to fetch speakers"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            let resp = err.error_response();
            assert_eq!(resp.status(), status);

            let body = to_bytes(resp.into_body()).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({ "error": err.to_string() }));
        }
    }
}
