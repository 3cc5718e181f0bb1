// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Instruction builder for avatar generation
//!
//! One deterministic instruction string per request. The anime title and the
//! optional character reference are embedded verbatim.

/// Build the generation instruction for the given anime title and optional
/// character reference.
pub fn build_instruction(anime_title: &str, anime_character: Option<&str>) -> String {
    let mut instruction = format!(
        "Analyze the provided selfie and extract the person's key facial features, \
         hair color/length/shape, eye shape/color, skin tone, face structure, and \
         expression. Infer the person's gender from the selfie and keep it the same \
         in the result. Then generate a new portrait as an original character \
         strictly in the visual style of the anime '{}'. ",
        anime_title
    );

    if let Some(character) = anime_character {
        instruction.push_str(&format!(
            "The character should subtly resemble '{}' while staying unique. ",
            character
        ));
    }

    instruction.push_str(
        "Match the canonical color palette, linework, shading, composition, and \
         rendering typical for the specified anime. No text, no watermark, no \
         signature. Upper body portrait on a clean simple background. High \
         resolution, professional digital art, masterpiece quality.",
    );

    instruction
}
