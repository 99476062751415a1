//! Line-stream driver: one token out per non-blank line in.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::producer::TokenProducer;
use crate::Result;

/// Counts reported by [`produce_lines`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineStats {
    /// Tokens written.
    pub produced: usize,
    /// Lines that were empty after trimming.
    pub skipped: usize,
}

/// Read `reader` line by line, pass each trimmed, non-empty line to
/// `producer`, and write every token to `writer` followed by `\n`.
///
/// Output order follows input order. The first producer or I/O error stops
/// the stream and is returned; tokens already written stay written, and the
/// writer is flushed in either case.
pub async fn produce_lines<R, W, P>(reader: R, mut writer: W, producer: &P) -> Result<LineStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: TokenProducer + ?Sized,
{
    let mut stats = LineStats::default();
    let result = drive(reader, &mut writer, producer, &mut stats).await;
    let flushed = writer.flush().await;

    result?;
    flushed?;

    if stats.skipped > 0 {
        tracing::debug!(skipped = stats.skipped, "skipped blank input lines");
    }
    tracing::info!(alg = producer.name(), produced = stats.produced, "finished");
    Ok(stats)
}

async fn drive<R, W, P>(mut reader: R, writer: &mut W, producer: &P, stats: &mut LineStats) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: TokenProducer + ?Sized,
{
    let mut line = Vec::new();
    let mut line_no = 0usize;

    while reader.read_until(b'\n', &mut line).await? > 0 {
        line_no += 1;
        let payload = trim_line(&line);
        if payload.is_empty() {
            stats.skipped += 1;
            line.clear();
            continue;
        }

        let token = producer.produce(payload).inspect_err(|e| {
            tracing::error!(line = line_no, alg = producer.name(), "failed to produce token: {e}");
        })?;
        writer.write_all(token.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        stats.produced += 1;

        line.clear();
    }

    Ok(())
}

/// Unicode whitespace is trimmed from valid UTF-8 lines, ASCII whitespace
/// from anything else.
fn trim_line(line: &[u8]) -> &[u8] {
    match std::str::from_utf8(line) {
        Ok(text) => text.trim().as_bytes(),
        Err(_) => line.trim_ascii(),
    }
}
