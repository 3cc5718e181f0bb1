// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Avatar Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-gemini-avatar-2025-08-06";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-06";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "avatar-generation",
    "gemini-image-output",
    "data-url-io",
    "rate-limit-retry",
    "permissive-cors",
];
