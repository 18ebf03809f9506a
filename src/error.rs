//! Error types for decoding snapshots and for running a viewer session.

use std::fmt;

use thiserror::Error;

use crate::messages::Side;

/// Which field of a `[price, amount]` entry failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelField {
    Price,
    Amount,
}

impl fmt::Display for LevelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelField::Price => f.write_str("price"),
            LevelField::Amount => f.write_str("amount"),
        }
    }
}

/// Failure to turn one snapshot message into a frame. Only the frame for that message is lost.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("bad {field} in {side} level {index}: {text:?}")]
    BadLevel {
        side: Side,
        index: usize,
        field: LevelField,
        text: String,
    },
    #[error("{side} sums overflow at level {index}")]
    Overflow { side: Side, index: usize },
}

/// Failures which end a viewer session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },
    #[error("stream read failed: {0}")]
    Read(#[from] tungstenite::Error),
    #[error("failed writing frame to viewer: {0}")]
    Write(#[from] std::io::Error),
}
