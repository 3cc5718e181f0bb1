// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Avatar generation API endpoint module
//!
//! Provides POST / for selfie-to-anime-avatar generation.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::generate_avatar_handler;
pub use request::{decode_image_payload, DecodedImage, GenerateAvatarRequest};
pub use response::{AvatarImage, GenerateAvatarResponse};
