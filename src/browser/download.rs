// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Asset downloads

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::assets::Asset;
use crate::error::{Error, Result};
use crate::http::{headers, Request, Transport};

const CHUNK_SIZE: usize = 8 * 1024;

/// Outcome of one asynchronous download
#[derive(Debug)]
pub struct AsyncDownloadResult<A, W> {
    /// The asset that was requested
    pub asset: A,
    /// The sink handed to `download_async`, returned for inspection
    pub sink: W,
    /// Bytes written into the sink, partial when `error` is set
    pub size: u64,
    pub error: Option<Error>,
}

/// Sending half of the channel async downloads report on
pub type AsyncDownloadChannel<A, W> = mpsc::Sender<AsyncDownloadResult<A, W>>;

/// Fetches assets independently of the browser that found them
#[derive(Clone)]
pub struct Downloader {
    transport: Arc<dyn Transport>,
    user_agent: String,
    timeout: Option<Duration>,
}

impl Downloader {
    pub fn new(transport: Arc<dyn Transport>, user_agent: impl Into<String>) -> Self {
        Self {
            transport,
            user_agent: user_agent.into(),
            timeout: None,
        }
    }

    /// Per-request timeout handed to the transport
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// GET the asset and stream its body into `sink`.
    ///
    /// Returns the number of bytes written. On error the sink keeps whatever
    /// arrived before the failure. The response status is not checked.
    pub async fn download<A, W>(&self, asset: &A, sink: &mut W) -> Result<u64>
    where
        A: Asset + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0;
        self.download_counted(asset, sink, &mut written).await?;
        Ok(written)
    }

    async fn download_counted<A, W>(&self, asset: &A, sink: &mut W, written: &mut u64) -> Result<()>
    where
        A: Asset + ?Sized,
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut request = Request::get(asset.url().as_str())?
            .header(headers::USER_AGENT, &self.user_agent)?;
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let mut response = self.transport.execute_stream(request).await?;
        tracing::debug!(
            url = %asset.url(),
            status = response.status_code(),
            expected = ?response.content_length(),
            "Downloading asset"
        );

        while let Some(chunk) = response.body.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            *written += chunk.len() as u64;
        }
        sink.flush().await?;

        tracing::debug!(url = %asset.url(), bytes = *written, "Downloaded asset");
        Ok(())
    }

    /// Download in a background task and report on `results`.
    ///
    /// Exactly one result is sent per call. The channel is never closed here,
    /// and a result is dropped silently if the receiver is gone.
    pub fn download_async<A, W>(
        &self,
        asset: A,
        sink: W,
        results: AsyncDownloadChannel<A, W>,
    ) -> JoinHandle<()>
    where
        A: Asset + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let downloader = self.clone();
        tokio::spawn(async move {
            let mut sink = sink;
            let mut size = 0;
            let error = downloader
                .download_counted(&asset, &mut sink, &mut size)
                .await
                .err();

            if let Some(ref e) = error {
                tracing::debug!(url = %asset.url(), error = %e, "Async download failed");
            }

            let _ = results
                .send(AsyncDownloadResult {
                    asset,
                    sink,
                    size,
                    error,
                })
                .await;
        })
    }
}

/// Write `body` into `sink` chunk by chunk, counting what landed
pub(crate) async fn write_body<W>(body: &Bytes, sink: &mut W, written: &mut u64) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    for chunk in body.chunks(CHUNK_SIZE) {
        sink.write_all(chunk).await?;
        *written += chunk.len() as u64;
    }
    sink.flush().await?;
    Ok(())
}
