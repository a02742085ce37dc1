use crate::error::GatewayError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

mod protocol;
pub mod routes;

/// Adapter that renders a `GatewayError` as the uniform `{"error": message}`
/// JSON body both endpoints share
#[derive(Debug)]
pub struct WebError {
    err: GatewayError,
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl actix_web::error::ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(protocol::ErrorResponse {
                error: self.to_string(),
            })
    }

    fn status_code(&self) -> StatusCode {
        match self.err {
            GatewayError::MissingFile
            | GatewayError::EmptyFile
            | GatewayError::MissingQuery
            | GatewayError::Decode(_)
            | GatewayError::Payload(_) => StatusCode::BAD_REQUEST,
            GatewayError::Provider(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Inference(_)
            | GatewayError::LabelLookup { .. }
            | GatewayError::WeightsLoad { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GatewayError> for WebError {
    fn from(err: GatewayError) -> WebError {
        WebError { err }
    }
}

impl From<actix_multipart::MultipartError> for WebError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        WebError {
            err: GatewayError::Payload(err.to_string()),
        }
    }
}

impl From<actix_web::error::JsonPayloadError> for WebError {
    fn from(err: actix_web::error::JsonPayloadError) -> Self {
        WebError {
            err: GatewayError::Payload(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::ResponseError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (GatewayError::MissingFile, StatusCode::BAD_REQUEST),
            (GatewayError::MissingQuery, StatusCode::BAD_REQUEST),
            (
                GatewayError::Decode("bad magic".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GatewayError::Provider("timed out".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                GatewayError::LabelLookup { index: 9, len: 4 },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(WebError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_malformed_json_keeps_error_contract() {
        let web_err = WebError::from(actix_web::error::JsonPayloadError::ContentType);
        assert_eq!(web_err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(web_err.err, GatewayError::Payload(_)));
    }

    #[test]
    fn test_error_body_shape() {
        let web_err = WebError::from(GatewayError::MissingFile);
        let body = serde_json::to_value(protocol::ErrorResponse {
            error: web_err.to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"error": "No file part"}));
    }
}
