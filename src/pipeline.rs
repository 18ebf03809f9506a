//! One synchronous pass from a [RawMessage] to a [RenderedFrame].

use crate::{
    aggregator::aggregate,
    config::{Config, Symbol},
    decoder::decode,
    error::DecodeError,
    messages::{RawMessage, RenderedFrame},
    render::render,
    window::{window, LevelOrder},
};

/// Decoder, windower, aggregator and renderer bound to the settings of one session.
#[derive(Clone, Debug)]
pub struct FramePipeline {
    symbol: String,
    depth: usize,
    level_order: LevelOrder,
}

impl FramePipeline {
    pub fn new(symbol: &Symbol, depth: usize, level_order: LevelOrder) -> Self {
        Self {
            symbol: symbol.upper(),
            depth,
            level_order,
        }
    }

    pub fn from_config(symbol: &Symbol, config: &Config) -> Self {
        Self::new(symbol, config.depth, config.level_order)
    }

    pub fn process(&self, raw: &RawMessage) -> Result<RenderedFrame, DecodeError> {
        let snapshot = decode(raw)?;
        let window = window(snapshot, self.depth, self.level_order);
        let (bids, asks) = aggregate(&window)?;
        Ok(render(&self.symbol, &window, &bids, &asks))
    }
}
