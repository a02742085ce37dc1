//! The gateway's error taxonomy. Every per-request failure becomes one of
//! these variants and is rendered as a `{"error": <message>}` JSON body at
//! the HTTP boundary; only `WeightsLoad` is fatal, and only at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The multipart form had no `file` field
    #[error("No file part")]
    MissingFile,

    /// The `file` field was present but carried no filename
    #[error("No selected file")]
    EmptyFile,

    /// The chat request had an empty or absent `query`
    #[error("No query provided")]
    MissingQuery,

    /// The uploaded bytes are not a decodable image
    #[error("could not decode image: {0}")]
    Decode(String),

    /// The request body itself was malformed (bad multipart framing or
    /// undeserializable JSON)
    #[error("malformed request body: {0}")]
    Payload(String),

    /// The forward pass failed inside libtorch
    #[error("inference failed: {0}")]
    Inference(#[from] tch::TchError),

    /// The model produced a class index outside the label table
    #[error("class index {index} out of range for {len} labels")]
    LabelLookup { index: usize, len: usize },

    /// Startup-only: the weights artifact is missing or its shapes do not
    /// match the model's parameters
    #[error("failed to load model weights from {path:?}: {source}")]
    WeightsLoad {
        path: PathBuf,
        source: tch::TchError,
    },

    /// The generative-language provider call failed
    #[error("language model request failed: {0}")]
    Provider(String),
}
