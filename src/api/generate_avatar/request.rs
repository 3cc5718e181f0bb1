// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Avatar generation request types, validation, and image decoding

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// Mime type assumed for bare base64 payloads and unreadable data-URL headers
const DEFAULT_INPUT_MIME: &str = "image/jpeg";

/// Request for avatar generation via POST /
///
/// All fields are optional at the serde level so that any JSON body
/// deserializes; required-field checks happen in [`validate`](Self::validate).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAvatarRequest {
    /// Selfie as a bare base64 string or a data URL
    #[serde(default)]
    pub image_base64: Option<String>,

    /// Anime whose visual style to apply
    #[serde(default)]
    pub anime_title: Option<String>,

    /// Optional character the result should subtly resemble
    #[serde(default)]
    pub anime_character: Option<String>,
}

/// An input image decoded from the request payload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GenerateAvatarRequest {
    /// Validate that both required fields are present and non-empty
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing = |field: &Option<String>| {
            field.as_deref().map(|s| s.is_empty()).unwrap_or(true)
        };
        if missing(&self.image_base64) || missing(&self.anime_title) {
            return Err(ApiError::ValidationError(
                "Missing required fields: imageBase64 and animeTitle".to_string(),
            ));
        }
        Ok(())
    }

    /// Decode the image payload into bytes plus a mime type
    pub fn decode_image(&self) -> Result<DecodedImage, ApiError> {
        decode_image_payload(self.image_base64.as_deref().unwrap_or_default())
    }
}

/// Decode a bare base64 string or a `data:<mime>;base64,<payload>` data URL.
///
/// The mime type comes from the data-URL header when readable and defaults to
/// image/jpeg otherwise. A payload that fails base64 decoding is a validation
/// error, never a crash.
pub fn decode_image_payload(raw: &str) -> Result<DecodedImage, ApiError> {
    let invalid = || ApiError::ValidationError("Invalid imageBase64".to_string());

    if let Some(rest) = raw.strip_prefix("data:") {
        let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
        let mime = header.split(';').next().unwrap_or_default().trim();
        let mime_type = if mime.is_empty() {
            DEFAULT_INPUT_MIME.to_string()
        } else {
            mime.to_string()
        };
        let bytes = STANDARD.decode(payload.as_bytes()).map_err(|_| invalid())?;
        Ok(DecodedImage { bytes, mime_type })
    } else {
        let bytes = STANDARD.decode(raw.as_bytes()).map_err(|_| invalid())?;
        Ok(DecodedImage {
            bytes,
            mime_type: DEFAULT_INPUT_MIME.to_string(),
        })
    }
}
