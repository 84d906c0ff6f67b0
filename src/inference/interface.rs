use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub instruction: String,
    pub image_data_url: String,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Response contained no choices")]
    EmptyReply,

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

pub trait InferenceClient {
    fn complete(&self, base_url: &str, prompt: &Prompt) -> Result<String, InferenceError>;
}
