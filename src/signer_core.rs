//! Key loading and streaming shared by the signer and encryptor binaries.

use std::path::Path;

use anyhow::{Context, Result};
use libsigners::{produce_lines, LineStats, TokenProducer};
use tokio::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};

pub async fn read_key_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("read key file: {}", path.display()))
}

/// Run every line of `input` through `producer`, writing tokens to `output`.
pub async fn stream<R, W, P>(input: R, output: W, producer: &P) -> libsigners::Result<LineStats>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    P: TokenProducer,
{
    tracing::debug!(alg = producer.name(), "reading payloads from input");
    produce_lines(BufReader::new(input), BufWriter::new(output), producer).await
}
