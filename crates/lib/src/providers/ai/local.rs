use crate::{
    errors::GeoError,
    providers::ai::{AiProvider, ImageData},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct LocalAiRequest<'a> {
    messages: Vec<LocalAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    temperature: f32,
    max_tokens: i32,
    stream: bool,
}

#[derive(Serialize, Debug, Clone)]
struct LocalAiMessage {
    role: String,
    /// Either a plain string or an array of typed content parts.
    content: Value,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponse {
    choices: Vec<LocalAiChoice>,
}

#[derive(Deserialize, Debug)]
struct LocalAiChoice {
    message: LocalAiResponseMessage,
}

#[derive(Deserialize, Debug)]
struct LocalAiResponseMessage {
    #[serde(default)]
    content: String,
}

// --- Local Provider implementation ---

/// A provider for interacting with a local or OpenAI-compatible API.
#[derive(Clone, Debug)]
pub struct LocalAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: Option<String>,
}

impl LocalAiProvider {
    /// Creates a new `LocalAiProvider`.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: Option<String>,
    ) -> Result<Self, GeoError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(GeoError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    async fn send(&self, system_prompt: &str, user_content: Value) -> Result<String, GeoError> {
        let messages = vec![
            LocalAiMessage {
                role: "system".to_string(),
                content: Value::String(system_prompt.to_string()),
            },
            LocalAiMessage {
                role: "user".to_string(),
                content: user_content,
            },
        ];

        let request_body = LocalAiRequest {
            messages,
            model: self.model.as_deref(),
            temperature: 0.0,
            max_tokens: 2048,
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(GeoError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeoError::AiApi(error_text));
        }

        let local_ai_response: LocalAiResponse = response
            .json()
            .await
            .map_err(GeoError::AiDeserialization)?;

        local_ai_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| GeoError::AiApi("Local AI returned no choices".to_string()))
    }
}

#[async_trait]
impl AiProvider for LocalAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, GeoError> {
        self.send(system_prompt, Value::String(user_prompt.to_string()))
            .await
    }

    async fn generate_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &ImageData,
    ) -> Result<String, GeoError> {
        let data_uri = format!("data:{};base64,{}", image.mime_type, image.to_base64());
        let content = json!([
            { "type": "text", "text": user_prompt },
            { "type": "image_url", "image_url": { "url": data_uri } }
        ]);
        self.send(system_prompt, content).await
    }
}
