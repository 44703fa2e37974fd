// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod errors;
pub mod routes;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::directory::ChannelDirectory;

pub use errors::{AppError, AppResult};
pub use routes::create_router;

/// Serves the directory until Ctrl-C.
pub async fn serve(directory: ChannelDirectory, addr: SocketAddr) -> Result<()> {
    // Surface a broken catalog at startup; requests would retry anyway.
    match directory.country_summaries().await {
        Ok(countries) => info!("Catalog ready with {} countries", countries.len()),
        Err(e) => warn!("Catalog not loadable yet: {:#}", anyhow::Error::new(e)),
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Channel directory listening on http://{}", addr);

    axum::serve(listener, create_router(directory))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
