// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini generateContent client for image generation over raw HTTPS

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;

use super::retry::RetryPolicy;
use super::types::{GeminiError, GeneratedImage};

/// Default mime type for generated images when the part carries none
const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// Client for the Gemini generateContent API
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
    retry: RetryPolicy,
}

// --- generateContent wire types ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub candidate_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part. Parts carry text, inline binary data, or both;
/// absent fields deserialize to None.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// The deployed API has returned this field under both spellings.
    #[serde(
        default,
        rename = "inlineData",
        alias = "inline_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

// --- Implementations ---

impl GeminiClient {
    /// Create a new GeminiClient from configuration.
    ///
    /// Fails when the credential is absent or the HTTP client cannot be
    /// built; callers that want a degraded node check the key first.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(
            "Gemini client configured: model={}, timeout={}s",
            config.model, config.timeout_secs
        );

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            api_key,
            timeout_secs: config.timeout_secs,
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the model ID
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate an image from an instruction plus an input image.
    ///
    /// Sends one multi-part user message (text instruction + inline image)
    /// requesting image-only output with a single candidate. Rate-limit
    /// responses are retried per the configured policy; any other failure is
    /// surfaced immediately.
    pub async fn generate(
        &self,
        instruction: &str,
        image_bytes: &[u8],
        image_mime: &str,
    ) -> Result<GeneratedImage, GeminiError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part {
                        text: Some(instruction.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: Some(image_mime.to_string()),
                            data: STANDARD.encode(image_bytes),
                        }),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                candidate_count: 1,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let mut attempt: u32 = 0;
        loop {
            debug!(
                "Gemini generate POST {} (attempt {}/{})",
                url,
                attempt + 1,
                self.retry.max_attempts
            );

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        GeminiError::Timeout {
                            timeout_secs: self.timeout_secs,
                        }
                    } else {
                        GeminiError::ApiError {
                            status: 0,
                            message: e.to_string(),
                        }
                    }
                })?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let hint = retry_after_secs(response.headers());
                attempt += 1;
                if attempt >= self.retry.max_attempts {
                    warn!("Gemini rate limited, retries exhausted after {} attempts", attempt);
                    return Err(GeminiError::RateLimited {
                        retry_after_secs: hint,
                    });
                }
                let delay = self.retry.next_delay(attempt - 1, hint);
                warn!(
                    "Gemini rate limited, retrying in {:?} ({}/{})",
                    delay, attempt, self.retry.max_attempts
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(GeminiError::ApiError {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GenerateContentResponse = response
                .json()
                .await
                .map_err(|e| GeminiError::ParseError(e.to_string()))?;
            return extract_image(parsed);
        }
    }
}

/// Parse a Retry-After header into whole seconds
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
}

/// Extract the first inline image from a generateContent response.
///
/// Scans the first candidate's parts in order. A text part is kept as a
/// fallback diagnostic when no image part is present, since the model may
/// explain why it declined to generate one.
pub fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, GeminiError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeminiError::NoImage);
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let mut declined_text: Option<String> = None;
    for part in parts {
        if let Some(inline) = part.inline_data {
            if !inline.data.is_empty() {
                let bytes = STANDARD
                    .decode(inline.data.as_bytes())
                    .map_err(|e| GeminiError::ParseError(format!("inline data: {}", e)))?;
                let mime_type = inline
                    .mime_type
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string());
                return Ok(GeneratedImage { bytes, mime_type });
            }
        }
        if declined_text.is_none() {
            if let Some(text) = part.text {
                if !text.trim().is_empty() {
                    declined_text = Some(text);
                }
            }
        }
    }

    match declined_text {
        Some(message) => Err(GeminiError::Declined { message }),
        None => Err(GeminiError::NoImage),
    }
}
