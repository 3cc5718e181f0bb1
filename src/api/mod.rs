// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod generate_avatar;
pub mod http_server;

pub use errors::{ApiError, ErrorBody};
pub use generate_avatar::{
    generate_avatar_handler, AvatarImage, GenerateAvatarRequest, GenerateAvatarResponse,
};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
