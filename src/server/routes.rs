//! The user-facing JSON endpoints: `/predict` accepts a multipart image
//! upload and returns the top class label; `/chat` relays a text query to
//! the generative-language provider.

use super::protocol;
use super::WebError;
use crate::error::GatewayError;
use crate::gemini::ChatRelay;
use crate::predict::Predictor;
use actix_multipart::Multipart;
use actix_web::{post, web, Responder};
use futures_util::TryStreamExt;
use std::sync::Mutex;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, WebError>;

/// Read the `file` field out of a multipart form. `MissingFile` when the
/// field is absent, `EmptyFile` when it carries no filename.
async fn read_file_field(mut payload: Multipart) -> Result<Vec<u8>> {
    while let Some(mut field) = payload.try_next().await? {
        let is_file = field.name() == "file";
        let unnamed = field
            .content_disposition()
            .get_filename()
            .map_or(true, str::is_empty);

        // Every field must be drained before the next one can be polled
        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if is_file {
                data.extend_from_slice(&chunk);
            }
        }

        if is_file {
            if unnamed {
                return Err(GatewayError::EmptyFile.into());
            }
            return Ok(data);
        }
    }
    Err(GatewayError::MissingFile.into())
}

#[post("/predict")]
pub async fn predict(
    payload: Multipart,
    state: web::Data<Mutex<Predictor>>,
) -> Result<impl Responder> {
    let bytes = read_file_field(payload).await?;

    let label = {
        let predictor = state.lock().unwrap();
        predictor.classify(&bytes).map_err(|e| {
            warn!("classification failed: {e}");
            e
        })?
    };

    info!("classified {} byte upload as {label:?}", bytes.len());
    Ok(web::Json(protocol::PredictResponse {
        predicted_class: label,
    }))
}

#[post("/chat")]
pub async fn chat(
    req: web::Json<protocol::ChatRequest>,
    relay: web::Data<ChatRelay>,
) -> Result<impl Responder> {
    let query = req.into_inner().query.unwrap_or_default();

    let response = relay.generate(&query).await.map_err(|e| {
        warn!("chat relay failed: {e}");
        e
    })?;

    info!("served chat response of {} chars", response.len());
    Ok(web::Json(protocol::ChatResponse { response }))
}
