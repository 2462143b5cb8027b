pub mod gemini;
pub mod local;

use crate::errors::GeoError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use dyn_clone::DynClone;
use regex::Regex;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This trait defines a common interface for text and multimodal generation
/// across different Large Language Models (e.g., Gemini, local models).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, GeoError>;

    /// Generates a response from a system prompt, a user prompt, and one image.
    async fn generate_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image: &ImageData,
    ) -> Result<String, GeoError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Raw image bytes with their MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageData {
    /// Wraps bytes whose format is recognized from their magic number.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, GeoError> {
        let mime_type = sniff_image_mime(&bytes)
            .ok_or_else(|| GeoError::ImageDecode("unrecognized image format".to_string()))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes,
        })
    }

    /// Decodes a base64 payload, accepting an optional `data:<mime>;base64,` prefix.
    pub fn from_base64(encoded: &str) -> Result<Self, GeoError> {
        let payload = match encoded.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => encoded,
        };
        let bytes = BASE64.decode(payload.trim())?;
        Self::from_bytes(bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// Identifies PNG, JPEG, GIF, and WEBP payloads.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

/// Returns the contents of the first markdown code block, or the trimmed input if there is none.
pub fn strip_code_fences(raw: &str) -> Result<String, GeoError> {
    let re = Regex::new(r"```(?:[A-Za-z]+)?\s*\n?([\s\S]*?)```")?;
    Ok(re
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| raw.trim().to_string()))
}
