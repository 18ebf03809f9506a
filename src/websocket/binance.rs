//! Types and async functions for connecting to the Binance partial book depth stream.
//!
//! Binance pushes a complete top-<levels> snapshot of the book every 100ms (or 1000ms)
//! on the `<symbol>@depth<levels>@<speed>ms` channel, with bids descending and asks
//! ascending by price. As every message is a full snapshot no local book needs to be
//! maintained and no REST snapshot is needed to synchronize.

use async_trait::async_trait;
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use tungstenite::protocol::{frame::coding::CloseCode, CloseFrame, Message};
use url::Url;

use crate::{
    error::SessionError,
    messages::RawMessage,
    websocket::{ByteStreamSource, StreamCloser},
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Reading half of a Binance depth stream connection.
#[derive(Debug)]
pub struct BinanceReader {
    read: SplitStream<WsStream>,
}

/// Closing half of a Binance depth stream connection.
#[derive(Debug)]
pub struct BinanceCloser {
    write: SplitSink<WsStream, Message>,
}

/// Open the depth stream at `url`. The connection is released once both halves are dropped.
pub async fn connect(url: &Url) -> Result<(BinanceReader, BinanceCloser), SessionError> {
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|source| SessionError::Connect {
            url: url.to_string(),
            source,
        })?;
    info!(%url, "binance ws client connected");
    let (write, read) = ws_stream.split();
    Ok((BinanceReader { read }, BinanceCloser { write }))
}

#[async_trait]
impl ByteStreamSource for BinanceReader {
    async fn next_message(&mut self) -> Option<Result<RawMessage, tungstenite::Error>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(RawMessage::from(text))),
                Ok(Message::Binary(data)) => return Some(Ok(RawMessage::new(data))),
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "binance closed the stream");
                    return None;
                }
                // tungstenite answers pings itself
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[async_trait]
impl StreamCloser for BinanceCloser {
    async fn send_close(&mut self) -> Result<(), tungstenite::Error> {
        self.write
            .send(Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            })))
            .await
    }
}
