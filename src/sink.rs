//! Destinations for rendered frames.

use std::io;

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
};

use crate::messages::RenderedFrame;

/// An ordered destination for rendered frames. A failed write ends the session.
#[async_trait]
pub trait TextSink: Send {
    async fn write_frame(&mut self, frame: &RenderedFrame) -> io::Result<()>;
}

/// Writes each frame to an [AsyncWrite] and flushes it, e.g. stdout.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> TextSink for WriterSink<W> {
    async fn write_frame(&mut self, frame: &RenderedFrame) -> io::Result<()> {
        self.writer.write_all(frame.as_str().as_bytes()).await?;
        self.writer.flush().await
    }
}

/// Forwards frames to a channel, e.g. one feeding a streaming HTTP response body.
/// The receiver going away means the viewer disconnected.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl TextSink for ChannelSink {
    async fn write_frame(&mut self, frame: &RenderedFrame) -> io::Result<()> {
        self.tx
            .send(frame.as_str().to_owned())
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "viewer disconnected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writer_sink_appends_frames() {
        let mut out = Vec::new();
        let mut sink = WriterSink::new(&mut out);
        sink.write_frame(&RenderedFrame::new("a\n".into())).await.unwrap();
        sink.write_frame(&RenderedFrame::new("b\n".into())).await.unwrap();
        drop(sink);
        assert_eq!(out, b"a\nb\n");
    }

    #[tokio::test]
    async fn channel_sink_reports_disconnect() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sink = ChannelSink::new(tx);
        sink.write_frame(&RenderedFrame::new("frame".into())).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("frame"));

        drop(rx);
        let err = sink
            .write_frame(&RenderedFrame::new("frame".into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
