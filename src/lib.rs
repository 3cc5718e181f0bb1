// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod gemini;
pub mod version;

// Re-export main types
pub use api::errors::{ApiError, ErrorBody};
pub use api::generate_avatar::{
    generate_avatar_handler, AvatarImage, GenerateAvatarRequest, GenerateAvatarResponse,
};
pub use config::{GeminiConfig, NodeConfig};
pub use gemini::{GeminiClient, GeminiError, GeneratedImage, RetryPolicy};
