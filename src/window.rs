//! Selection of the top-<depth> levels of each side of a snapshot.

use serde::Deserialize;

use crate::messages::{DepthWindow, OrderbookSnapshot, PriceLevel};

/// How the exchange orders the levels of each side of a snapshot.
///
/// Binance partial depth streams send bids descending and asks ascending, i.e. best
/// price first. Feeds sending the best price last are reversed before truncation.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all(deserialize = "snake_case"))]
pub enum LevelOrder {
    #[default]
    BestFirst,
    BestLast,
}

/// Return a new [DepthWindow] with each side truncated to `depth` levels, best first.
/// A side with fewer than `depth` levels is kept whole.
pub fn window(snapshot: OrderbookSnapshot, depth: usize, order: LevelOrder) -> DepthWindow {
    DepthWindow {
        bids: truncate_side(snapshot.bids, depth, order),
        asks: truncate_side(snapshot.asks, depth, order),
    }
}

fn truncate_side(mut levels: Vec<PriceLevel>, depth: usize, order: LevelOrder) -> Vec<PriceLevel> {
    match order {
        LevelOrder::BestFirst => {
            levels.truncate(depth);
            levels
        }
        LevelOrder::BestLast => levels.into_iter().rev().take(depth).collect(),
    }
}
