//! Streamed download of a remote image into a writer.
//!
//! The download is split in two so callers can acquire the sink only after
//! the remote has answered with a success status: [`request`] sends the GET
//! and checks the status, [`stream_to`] copies the body.

use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::PipelineError;

/// Size of the write buffer placed in front of the sink.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// GET `url` and fail unless the remote answers with a success status.
///
/// Malformed URLs, network failures and non-success statuses map to
/// [`PipelineError::Fetch`].
pub async fn request(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, PipelineError> {
    let response = client.get(url).send().await?.error_for_status()?;
    tracing::debug!(
        url,
        status = %response.status(),
        content_length = ?response.content_length(),
        "download started"
    );
    Ok(response)
}

/// Stream the body of `response` into `sink`, returning the number of bytes
/// written.
///
/// Body stream errors map to [`PipelineError::Fetch`]; failures writing to
/// `sink` map to [`PipelineError::Scratch`]. The sink is flushed before
/// returning.
pub async fn stream_to<W>(response: reqwest::Response, sink: W) -> Result<u64, PipelineError>
where
    W: AsyncWrite + Unpin,
{
    let url = response.url().to_string();
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, sink);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;

    tracing::debug!(url = %url, bytes = written, "download finished");
    Ok(written)
}

/// [`request`] followed by [`stream_to`].
pub async fn download<W>(
    client: &reqwest::Client,
    url: &str,
    sink: W,
) -> Result<u64, PipelineError>
where
    W: AsyncWrite + Unpin,
{
    let response = request(client, url).await?;
    stream_to(response, sink).await
}
