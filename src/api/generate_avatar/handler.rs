// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Avatar generation endpoint handler

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use super::request::GenerateAvatarRequest;
use super::response::GenerateAvatarResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::gemini::build_instruction;

/// POST / - Generate an anime-styled avatar from a selfie
///
/// Pipeline:
/// 1. Parse the body as JSON; an unparseable body counts as an empty object
/// 2. Validate required fields
/// 3. Decode the base64 / data-URL selfie
/// 4. Build the instruction string
/// 5. Call the Gemini client (429s retried inside the client)
/// 6. Re-encode the returned image as a data URL
pub async fn generate_avatar_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateAvatarResponse>, ApiError> {
    // Malformed JSON falls through to the missing-fields rejection below
    // instead of a framework-level 4xx/5xx.
    let request: GenerateAvatarRequest =
        serde_json::from_slice(&body).unwrap_or_default();

    request.validate().map_err(|e| {
        warn!("Avatar generation validation failed: {}", e);
        e
    })?;

    let image = request.decode_image().map_err(|e| {
        warn!("Avatar generation image decode failed: {}", e);
        e
    })?;

    let client = state.gemini.as_ref().ok_or_else(|| {
        warn!("Avatar generation requested but GEMINI_API_KEY is not configured");
        ApiError::Configuration("Server misconfigured: GEMINI_API_KEY is not set".to_string())
    })?;

    let anime_title = request.anime_title.as_deref().unwrap_or_default();
    let anime_character = request.anime_character.as_deref().filter(|c| !c.is_empty());
    let instruction = build_instruction(anime_title, anime_character);

    debug!(
        "Avatar generation request: title='{}', character={:?}, image={} bytes ({})",
        anime_title,
        anime_character,
        image.bytes.len(),
        image.mime_type
    );

    let generated = client
        .generate(&instruction, &image.bytes, &image.mime_type)
        .await
        .map_err(|e| {
            warn!("Avatar generation upstream call failed: {}", e);
            ApiError::from(e)
        })?;

    info!(
        "Avatar generated: title='{}', {} bytes ({})",
        anime_title,
        generated.bytes.len(),
        generated.mime_type
    );

    let data_url = format!(
        "data:{};base64,{}",
        generated.mime_type,
        STANDARD.encode(&generated.bytes)
    );
    Ok(Json(GenerateAvatarResponse::new(
        data_url,
        generated.mime_type,
    )))
}
