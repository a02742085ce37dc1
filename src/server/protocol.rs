use serde::{Deserialize, Serialize};

/// Successful `/predict` body
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_class: String,
}

/// `/chat` request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

/// Successful `/chat` body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// The uniform error body shared by both endpoints
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
