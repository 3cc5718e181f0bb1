// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the Gemini image model client

use thiserror::Error;

/// A generated image extracted from an upstream response
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Mime type reported by the model, defaulted to image/png
    pub mime_type: String,
}

/// Errors that can occur when calling the Gemini image model
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Rate limited by the model after exhausting all retry attempts
    #[error("Image model rate limited")]
    RateLimited {
        /// Remaining wait hint from the last Retry-After header, if any
        retry_after_secs: Option<u64>,
    },

    /// Non-2xx response from the model API
    #[error("Image model API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message or response body
        message: String,
    },

    /// Upstream request timed out
    #[error("Image model request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds
        timeout_secs: u64,
    },

    /// The model returned text instead of an image, usually an explanation
    /// of why it declined to generate one
    #[error("Image model declined: {message}")]
    Declined {
        /// Text returned by the model
        message: String,
    },

    /// The response contained neither an image nor explanatory text
    #[error("No image in model response")]
    NoImage,

    /// The response could not be parsed
    #[error("Invalid image model response: {0}")]
    ParseError(String),
}
