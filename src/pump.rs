//! The streaming core of a viewer session.
//!
//! Two tasks share one exchange connection:
//!
//! - the reader owns the reading half, pulls raw messages off the stream and hands each
//!   one over through a zero-capacity [handoff](crate::handoff), so it never reads
//!   ahead of the processor by more than one message;
//! - the processor takes messages in arrival order, runs each through the
//!   [FramePipeline] and writes the frame to the sink before taking the next one.
//!
//! The session ends when the stream ends (the reader drops its end of the handoff),
//! when the sink fails, or when the shutdown token is cancelled. A frame already
//! rendered is still written if the sink takes it without blocking. On cancellation
//! or sink failure the processor sends a close frame and keeps draining the handoff
//! until the reader sees the peer's acknowledgment, or forces the connection closed
//! after `close_timeout`.
//! There is no reconnection, a finished stream ends the session.

use std::time::Duration;

use tokio::{task::JoinHandle, time::timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    error::SessionError,
    handoff,
    messages::RawMessage,
    pipeline::FramePipeline,
    sink::TextSink,
    websocket::{ByteStreamSource, StreamCloser},
};

/// Why a session ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The exchange closed the stream.
    StreamClosed,
    /// Reading from the stream failed.
    StreamFailed,
    /// Shutdown was requested.
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub frames_written: u64,
    /// Messages dropped because they did not decode.
    pub frames_skipped: u64,
}

enum Stop {
    StreamDone,
    Cancelled,
    SinkFailed(std::io::Error),
}

/// A viewer session over one exchange connection and one sink.
pub struct StreamPump<S, C, K> {
    source: S,
    closer: C,
    sink: K,
    pipeline: FramePipeline,
    close_timeout: Duration,
}

impl<S, C, K> StreamPump<S, C, K>
where
    S: ByteStreamSource,
    C: StreamCloser,
    K: TextSink,
{
    pub fn new(
        source: S,
        closer: C,
        sink: K,
        pipeline: FramePipeline,
        close_timeout: Duration,
    ) -> Self {
        Self {
            source,
            closer,
            sink,
            pipeline,
            close_timeout,
        }
    }

    /// Run the session until the stream ends, the sink fails or `shutdown` is cancelled.
    /// The connection is released when this returns.
    pub async fn run(self, shutdown: CancellationToken) -> Result<SessionSummary, SessionError> {
        let Self {
            source,
            mut closer,
            mut sink,
            pipeline,
            close_timeout,
        } = self;

        let (handoff_tx, mut handoff_rx) = handoff::channel();
        let reader = tokio::spawn(read_stream(source, handoff_tx));

        let mut frames_written = 0;
        let mut frames_skipped = 0;
        let stop = loop {
            let raw = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break Stop::Cancelled,
                raw = handoff_rx.recv() => match raw {
                    Some(raw) => raw,
                    None => break Stop::StreamDone,
                },
            };

            let frame = match pipeline.process(&raw) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(error = %e, bytes = raw.len(), "skipping undecodable snapshot");
                    frames_skipped += 1;
                    continue;
                }
            };

            // a write the sink can take wins over shutdown, only a blocked write is abandoned
            tokio::select! {
                biased;
                written = sink.write_frame(&frame) => match written {
                    Ok(()) => frames_written += 1,
                    Err(e) => break Stop::SinkFailed(e),
                },
                _ = shutdown.cancelled() => break Stop::Cancelled,
            }
        };

        let end = match stop {
            Stop::StreamDone => match reader.await {
                Ok(Ok(())) => {
                    info!("stream closed by exchange");
                    SessionEnd::StreamClosed
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "stream read failed");
                    SessionEnd::StreamFailed
                }
                Err(e) => {
                    error!(error = %e, "stream reader task failed");
                    SessionEnd::StreamFailed
                }
            },
            Stop::Cancelled => {
                info!("shutdown requested, closing stream");
                close_stream(&mut closer, handoff_rx, reader, close_timeout).await;
                SessionEnd::Cancelled
            }
            Stop::SinkFailed(e) => {
                error!(error = %e, frames_written, "viewer sink failed, closing stream");
                close_stream(&mut closer, handoff_rx, reader, close_timeout).await;
                return Err(SessionError::Write(e));
            }
        };

        let summary = SessionSummary {
            end,
            frames_written,
            frames_skipped,
        };
        info!(?summary, "session ended");
        Ok(summary)
    }
}

/// Reader task: hand every message over until the stream ends or the processor is gone.
async fn read_stream<S: ByteStreamSource>(
    mut source: S,
    handoff: handoff::Sender<RawMessage>,
) -> Result<(), SessionError> {
    while let Some(message) = source.next_message().await {
        if handoff.send(message?).await.is_err() {
            debug!("processor gone, reader stopping");
            break;
        }
    }
    Ok(())
}

/// Close handshake: send a close frame, then discard whatever the reader still hands
/// over until it sees the end of the stream. Past `close_timeout` the reader is aborted,
/// dropping the connection.
async fn close_stream<C: StreamCloser>(
    closer: &mut C,
    mut handoff_rx: handoff::Receiver<RawMessage>,
    reader: JoinHandle<Result<(), SessionError>>,
    close_timeout: Duration,
) {
    let handshake = async {
        closer.send_close().await?;
        let mut discarded = 0u64;
        while handoff_rx.recv().await.is_some() {
            discarded += 1;
        }
        Ok::<_, tungstenite::Error>(discarded)
    };
    match timeout(close_timeout, handshake).await {
        Ok(Ok(discarded)) => debug!(discarded, "close handshake complete"),
        Ok(Err(e)) => {
            warn!(error = %e, "failed to send close frame, dropping connection");
            reader.abort();
        }
        Err(_) => {
            warn!(?close_timeout, "close handshake timed out, dropping connection");
            reader.abort();
        }
    }
}
