// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use std::path::PathBuf;
use thiserror::Error;

/// The channel catalog could not be produced. Requests are never answered
/// from a partially loaded catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no catalog path configured")]
    Missing,

    #[error("failed to read channel catalog {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse channel catalog {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a page of channels could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("channel directory unavailable: {0}")]
    Unavailable(String),

    #[error("request to channel directory failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("channel directory answered with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode channel directory response: {0}")]
    Decode(String),
}

impl From<CatalogError> for FetchError {
    fn from(err: CatalogError) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        FetchError::Unavailable(message)
    }
}
