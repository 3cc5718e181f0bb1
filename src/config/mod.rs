// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded once from the environment at startup

use std::env;

/// Default Gemini model used for avatar generation
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default upstream call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default API listen port
pub const DEFAULT_API_PORT: u16 = 8080;

/// Configuration for the upstream Gemini image model
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API credential. None when GEMINI_API_KEY is absent; the node still
    /// starts but every generation request fails with a configuration error.
    pub api_key: Option<String>,
    /// Model ID (e.g. "gemini-2.5-flash-image-preview")
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Upstream call timeout in seconds
    pub timeout_secs: u64,
}

/// Top-level node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Port the HTTP API listens on
    pub api_port: u16,
    /// Upstream model configuration
    pub gemini: GeminiConfig,
}

impl NodeConfig {
    /// Read configuration from environment variables.
    ///
    /// All values except the credential have defaults; a missing credential
    /// is reported per request rather than aborting startup, so /health and
    /// CORS preflight keep working on a misconfigured node.
    pub fn from_env() -> Self {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_port,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
                timeout_secs,
            },
        }
    }
}
