// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gemini image model client
//!
//! Reaches the upstream generateContent endpoint over raw HTTPS, retries
//! rate-limit responses with jittered exponential backoff, and extracts the
//! first inline image part from the response.

pub mod client;
pub mod prompt;
pub mod retry;
pub mod types;

pub use client::{GeminiClient, GenerateContentResponse};
pub use prompt::build_instruction;
pub use retry::RetryPolicy;
pub use types::{GeminiError, GeneratedImage};
