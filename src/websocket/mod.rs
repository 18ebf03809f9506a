//! Exchange websocket clients feeding raw depth snapshots to the pump.
//!
//! A connection is split into a reading half, owned by the pump's reader task, and a
//! closing half used by the processor to start the close handshake. The pump only
//! depends on the two traits below, so it can be driven by any source.

use async_trait::async_trait;

use crate::messages::RawMessage;

pub mod binance;

/// The reading half of an exchange connection.
#[async_trait]
pub trait ByteStreamSource: Send + 'static {
    /// Wait for the next payload. `None` once the peer closed the stream, an error when
    /// the connection failed. Either way the stream is finished.
    async fn next_message(&mut self) -> Option<Result<RawMessage, tungstenite::Error>>;
}

/// The writing half of an exchange connection, only used to close it.
#[async_trait]
pub trait StreamCloser: Send {
    /// Send a close notification. The peer's acknowledgment ends the reading half.
    async fn send_close(&mut self) -> Result<(), tungstenite::Error>;
}
