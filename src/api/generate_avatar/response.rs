// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Avatar generation response types

use serde::{Deserialize, Serialize};

/// Successful response from avatar generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAvatarResponse {
    /// Always true on the success path
    pub success: bool,
    /// The generated avatar
    pub image: AvatarImage,
}

/// The generated avatar as a data URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarImage {
    /// `data:<mime>;base64,<payload>` encoding of the generated image
    pub data_url: String,
    /// Mime type of the generated image
    pub mime_type: String,
}

impl GenerateAvatarResponse {
    pub fn new(data_url: String, mime_type: String) -> Self {
        Self {
            success: true,
            image: AvatarImage {
                data_url,
                mime_type,
            },
        }
    }
}
