//! Decoding of raw partial-depth messages into [OrderbookSnapshot]s.
//!
//! A message is a JSON object with `bids` and `asks` fields, each a list of
//! `[price, amount, ...]` entries. Other top-level fields (e.g. `lastUpdateId`) are
//! ignored, as are trailing fields of an entry.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    error::{DecodeError, LevelField},
    messages::{OrderbookSnapshot, PriceLevel, RawMessage, Side},
    utils::{LevelEntry, NumericText},
};

/// The structure of a partial book depth message received by our client.
#[derive(Debug, Deserialize)]
struct WsSnapshot {
    bids: Vec<LevelEntry>,
    asks: Vec<LevelEntry>,
}

/// Decode one raw message. Fails on the first level which does not parse.
pub fn decode(raw: &RawMessage) -> Result<OrderbookSnapshot, DecodeError> {
    let WsSnapshot { bids, asks } = serde_json::from_slice(raw.as_bytes())?;
    Ok(OrderbookSnapshot {
        bids: parse_side(Side::Bids, bids)?,
        asks: parse_side(Side::Asks, asks)?,
    })
}

fn parse_side(side: Side, entries: Vec<LevelEntry>) -> Result<Vec<PriceLevel>, DecodeError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let price = parse_field(side, index, LevelField::Price, entry.price)?;
            let amount = parse_field(side, index, LevelField::Amount, entry.amount)?;
            Ok(PriceLevel::new(price, amount))
        })
        .collect()
}

fn parse_field(
    side: Side,
    index: usize,
    field: LevelField,
    text: Option<NumericText>,
) -> Result<Decimal, DecodeError> {
    let text = text.map(|t| t.0).unwrap_or_default();
    let bad_level = |text: String| DecodeError::BadLevel {
        side,
        index,
        field,
        text,
    };
    // exchanges may use scientific notation for tiny amounts
    let value = Decimal::from_str(text.trim())
        .or_else(|_| Decimal::from_scientific(text.trim()))
        .map_err(|_| bad_level(text.clone()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(bad_level(text));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn decode_partial_depth_message() {
        let raw = RawMessage::from(
            r#"{"lastUpdateId":160,"bids":[["0.0024","10"],["0.0023","1.5",[]]],"asks":[["0.0026","100"]]}"#,
        );
        let snapshot = decode(&raw).unwrap();
        assert_eq!(
            snapshot.bids,
            vec![
                PriceLevel::new(dec!(0.0024), dec!(10)),
                PriceLevel::new(dec!(0.0023), dec!(1.5)),
            ]
        );
        assert_eq!(snapshot.asks, vec![PriceLevel::new(dec!(0.0026), dec!(100))]);
    }

    #[test]
    fn decode_keeps_received_order() {
        let raw = RawMessage::from(r#"{"bids":[["1","1"],["3","1"],["2","1"]],"asks":[]}"#);
        let prices: Vec<_> = decode(&raw).unwrap().bids.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(1), dec!(3), dec!(2)]);
    }

    #[test]
    fn decode_accepts_bare_numbers_and_exponents() {
        let raw = RawMessage::from(r#"{"bids":[[100.5, 2]],"asks":[["101","1e-3"]]}"#);
        let snapshot = decode(&raw).unwrap();
        assert_eq!(snapshot.bids[0], PriceLevel::new(dec!(100.5), dec!(2)));
        assert_eq!(snapshot.asks[0], PriceLevel::new(dec!(101), dec!(0.001)));
    }

    #[test]
    fn decode_empty_sides() {
        let snapshot = decode(&RawMessage::from(r#"{"bids":[],"asks":[]}"#)).unwrap();
        assert_eq!(snapshot, OrderbookSnapshot::default());
    }

    #[test]
    fn bad_price_reports_level() {
        let raw = RawMessage::from(r#"{"bids":[["100.0","1.0"]],"asks":[["101","1"],["abc","1"]]}"#);
        match decode(&raw) {
            Err(DecodeError::BadLevel {
                side,
                index,
                field,
                text,
            }) => {
                assert_eq!(side, Side::Asks);
                assert_eq!(index, 1);
                assert_eq!(field, LevelField::Price);
                assert_eq!(text, "abc");
            }
            other => panic!("expected BadLevel, got {other:?}"),
        }
    }

    #[test]
    fn short_entry_is_bad_amount() {
        let raw = RawMessage::from(r#"{"bids":[["100.0"]],"asks":[]}"#);
        assert!(matches!(
            decode(&raw),
            Err(DecodeError::BadLevel {
                side: Side::Bids,
                index: 0,
                field: LevelField::Amount,
                ..
            })
        ));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let raw = RawMessage::from(r#"{"bids":[["100.0","-1"]],"asks":[]}"#);
        assert!(matches!(decode(&raw), Err(DecodeError::BadLevel { .. })));
    }

    #[test]
    fn non_numeric_scalars_are_bad_levels() {
        let raw = RawMessage::from(r#"{"bids":[["1","1"],[null,"1"]],"asks":[]}"#);
        match decode(&raw) {
            Err(DecodeError::BadLevel {
                side,
                index,
                field,
                text,
            }) => {
                assert_eq!((side, index, field), (Side::Bids, 1, LevelField::Price));
                assert_eq!(text, "null");
            }
            other => panic!("expected BadLevel, got {other:?}"),
        }

        let raw = RawMessage::from(r#"{"bids":[],"asks":[["1",false]]}"#);
        assert!(matches!(
            decode(&raw),
            Err(DecodeError::BadLevel {
                side: Side::Asks,
                index: 0,
                field: LevelField::Amount,
                ..
            })
        ));
    }

    #[test]
    fn malformed_payloads() {
        for payload in [
            "",
            "not json",
            r#"{"bids":[]}"#,
            r#"{"bids":"x","asks":[]}"#,
            r#"{"bids":[{"p":"1"}],"asks":[]}"#,
        ] {
            assert!(
                matches!(decode(&RawMessage::from(payload)), Err(DecodeError::Malformed(_))),
                "payload {payload:?} should be malformed"
            );
        }
    }

    #[test]
    fn reencoded_snapshot_decodes_to_same_levels() {
        let raw = RawMessage::from(
            r#"{"bids":[["27000.10000000","0.25100000"],["26999.5","3"]],"asks":[["27000.2","0.001"]]}"#,
        );
        let snapshot = decode(&raw).unwrap();
        let encode = |levels: &[PriceLevel]| {
            levels
                .iter()
                .map(|l| vec![l.price.to_string(), l.amount.to_string()])
                .collect::<Vec<_>>()
        };
        let reencoded = serde_json::json!({
            "bids": encode(&snapshot.bids),
            "asks": encode(&snapshot.asks),
        });
        let again = decode(&RawMessage::from(reencoded.to_string())).unwrap();
        assert_eq!(snapshot, again);
    }
}
