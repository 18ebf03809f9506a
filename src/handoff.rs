//! Zero-capacity handoff between the stream reader and the frame processor.
//!
//! [Sender::send] only completes once the [Receiver] has taken the item, so the reader
//! never pulls message N+1 off the socket before message N has been accepted
//! downstream. At most one message is in flight between the two tasks, which is the
//! backpressure contract of the pump: a slow viewer slows reads from the exchange
//! instead of growing a queue.
//!
//! Dropping the [Sender] is the completion signal: [Receiver::recv] then returns `None`.

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Create a connected rendezvous pair.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    // the slot holds the single in-flight item, the ack releases the sender
    let (tx, rx) = mpsc::channel(1);
    (Sender { tx }, Receiver { rx })
}

/// The receiver went away before taking the item.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("handoff receiver closed")]
pub struct Closed;

#[derive(Debug)]
pub struct Sender<T> {
    tx: mpsc::Sender<(T, oneshot::Sender<()>)>,
}

#[derive(Debug)]
pub struct Receiver<T> {
    rx: mpsc::Receiver<(T, oneshot::Sender<()>)>,
}

impl<T> Sender<T> {
    /// Hand `item` over, waiting until the receiver has taken it.
    pub async fn send(&self, item: T) -> Result<(), Closed> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx.send((item, ack_tx)).await.map_err(|_| Closed)?;
        ack_rx.await.map_err(|_| Closed)
    }
}

impl<T> Receiver<T> {
    /// Take the next item, releasing its sender. `None` once the sender is dropped.
    pub async fn recv(&mut self) -> Option<T> {
        let (item, ack) = self.rx.recv().await?;
        // the sender may have been cancelled while waiting, nothing to release then
        let _ = ack.send(());
        Some(item)
    }
}
