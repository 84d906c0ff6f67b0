use crate::inference::interface::{InferenceClient, InferenceError, Prompt};
use crate::library::logger::interface::Logger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest<'a> {
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct InferenceClientHttp {
    agent: ureq::Agent,
    max_tokens: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl InferenceClientHttp {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            max_tokens,
            logger: logger.with_namespace("inference").with_namespace("http"),
        }
    }
}

pub fn completions_url(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim().trim_end_matches('/'))
}

fn request_body(max_tokens: u32, prompt: &Prompt) -> ChatRequest<'_> {
    ChatRequest {
        max_tokens,
        messages: vec![Message {
            role: "user",
            content: vec![
                ContentPart::Text {
                    text: &prompt.instruction,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: &prompt.image_data_url,
                    },
                },
            ],
        }],
    }
}

impl InferenceClient for InferenceClientHttp {
    fn complete(&self, base_url: &str, prompt: &Prompt) -> Result<String, InferenceError> {
        let url = completions_url(base_url);
        let _ = self.logger.info(&format!(
            "POST {} ({} bytes of image data)",
            url,
            prompt.image_data_url.len()
        ));

        let response = match self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(request_body(self.max_tokens, prompt))
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(InferenceError::Server { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(InferenceError::Transport(transport.to_string()));
            }
        };

        let parsed: ChatResponse = response
            .into_json()
            .map_err(|e| InferenceError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(InferenceError::EmptyReply)
    }
}
