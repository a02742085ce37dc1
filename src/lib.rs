pub mod error;
pub mod gemini;
pub mod labels;
pub mod predict;
pub mod server;
pub mod settings;
pub mod torch;
