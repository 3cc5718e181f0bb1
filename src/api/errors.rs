// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! API error taxonomy and JSON error responses
//!
//! Every failure is converted to a structured JSON body at the handler
//! boundary; nothing escapes as a bare framework error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::gemini::GeminiError;

/// Machine-readable code attached to rate-limit failures
pub const RATE_LIMIT_ERROR_CODE: &str = "RATE_LIMIT_ERROR";

/// JSON error body returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_sec: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            success: None,
            error: error.into(),
            error_code: None,
            retry_after_sec: None,
            details: None,
        }
    }
}

/// Failures the avatar endpoint can produce
#[derive(Debug, Clone)]
pub enum ApiError {
    MethodNotAllowed,
    ValidationError(String),
    Configuration(String),
    RateLimited {
        retry_after_secs: Option<u64>,
    },
    Upstream {
        message: String,
        details: Option<String>,
    },
    NoImage,
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MethodNotAllowed => 405,
            ApiError::ValidationError(_) => 400,
            ApiError::Configuration(_) => 500,
            ApiError::RateLimited { .. } => 429,
            ApiError::Upstream { .. } => 500,
            ApiError::NoImage => 500,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            ApiError::MethodNotAllowed => ErrorBody::plain("Method not allowed"),
            ApiError::ValidationError(msg) => ErrorBody::plain(msg.clone()),
            ApiError::Configuration(msg) => ErrorBody::plain(msg.clone()),
            ApiError::RateLimited { retry_after_secs } => ErrorBody {
                success: Some(false),
                error: "Rate limit exceeded. Please try again later.".to_string(),
                error_code: Some(RATE_LIMIT_ERROR_CODE.to_string()),
                retry_after_sec: *retry_after_secs,
                details: None,
            },
            ApiError::Upstream { message, details } => ErrorBody {
                success: Some(false),
                error: message.clone(),
                error_code: None,
                retry_after_sec: None,
                details: details.clone(),
            },
            ApiError::NoImage => ErrorBody::plain("No image generated"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MethodNotAllowed => write!(f, "Method not allowed"),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ApiError::RateLimited { .. } => write!(f, "Rate limit exceeded"),
            ApiError::Upstream { message, .. } => write!(f, "Upstream error: {}", message),
            ApiError::NoImage => write!(f, "No image generated"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_body())).into_response()
    }
}

impl From<GeminiError> for ApiError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::RateLimited { retry_after_secs } => {
                ApiError::RateLimited { retry_after_secs }
            }
            GeminiError::Declined { message } => ApiError::Upstream {
                message,
                details: None,
            },
            GeminiError::ApiError { status, message } => ApiError::Upstream {
                message: "Image generation failed".to_string(),
                details: Some(format!("upstream returned {}: {}", status, message)),
            },
            GeminiError::Timeout { timeout_secs } => ApiError::Upstream {
                message: "Image generation failed".to_string(),
                details: Some(format!("upstream timed out after {}s", timeout_secs)),
            },
            GeminiError::ParseError(msg) => ApiError::Upstream {
                message: "Image generation failed".to_string(),
                details: Some(format!("invalid upstream response: {}", msg)),
            },
            GeminiError::NoImage => ApiError::NoImage,
        }
    }
}
