//! Running sums over the windowed levels of each side of the book.

use crate::{
    error::DecodeError,
    messages::{DepthWindow, PriceLevel, Side, SideAggregate},
};

/// Sum prices, amounts and notionals of one side. An empty side sums to zero.
/// Fails if a notional or a running sum overflows the decimal range.
pub fn aggregate_side(side: Side, levels: &[PriceLevel]) -> Result<SideAggregate, DecodeError> {
    levels
        .iter()
        .enumerate()
        .try_fold(SideAggregate::default(), |acc, (index, level)| {
            let overflow = || DecodeError::Overflow { side, index };
            let notional = level.notional().ok_or_else(overflow)?;
            Ok(SideAggregate {
                price_sum: acc.price_sum.checked_add(level.price).ok_or_else(overflow)?,
                amount_sum: acc.amount_sum.checked_add(level.amount).ok_or_else(overflow)?,
                notional_sum: acc.notional_sum.checked_add(notional).ok_or_else(overflow)?,
            })
        })
}

/// Aggregates for (bids, asks).
pub fn aggregate(window: &DepthWindow) -> Result<(SideAggregate, SideAggregate), DecodeError> {
    Ok((
        aggregate_side(Side::Bids, &window.bids)?,
        aggregate_side(Side::Asks, &window.asks)?,
    ))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn aggregation() {
        let window = DepthWindow {
            bids: vec![
                PriceLevel::new(dec!(100.0), dec!(1.0)),
                PriceLevel::new(dec!(99.0), dec!(2.0)),
            ],
            asks: vec![PriceLevel::new(dec!(101.0), dec!(1.5))],
        };
        let (bids, asks) = aggregate(&window).unwrap();
        assert_eq!(
            bids,
            SideAggregate {
                price_sum: dec!(199),
                amount_sum: dec!(3),
                notional_sum: dec!(298),
            }
        );
        assert_eq!(
            asks,
            SideAggregate {
                price_sum: dec!(101),
                amount_sum: dec!(1.5),
                notional_sum: dec!(151.5),
            }
        );
    }

    #[test]
    fn notional_is_sum_of_products() {
        let levels: Vec<_> = (1..=20)
            .map(|i| PriceLevel::new(Decimal::new(27_000_00 + i, 2), Decimal::new(i * 37, 4)))
            .collect();
        let expected: Decimal = levels.iter().map(|l| l.price * l.amount).sum();
        assert_eq!(aggregate_side(Side::Bids, &levels).unwrap().notional_sum, expected);
    }

    #[test]
    fn empty_window_is_all_zero() {
        let (bids, asks) = aggregate(&DepthWindow::default()).unwrap();
        assert_eq!(bids, SideAggregate::default());
        assert_eq!(asks, SideAggregate::default());
        assert_eq!(bids.notional_sum, Decimal::ZERO);
    }

    #[test]
    fn overflowing_notional_is_an_error() {
        let window = DepthWindow {
            bids: vec![PriceLevel::new(Decimal::MAX, dec!(2))],
            asks: vec![],
        };
        assert!(matches!(
            aggregate(&window),
            Err(DecodeError::Overflow {
                side: Side::Bids,
                index: 0
            })
        ));
    }

    #[test]
    fn overflowing_price_sum_is_an_error() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let levels = vec![
            PriceLevel::new(huge, Decimal::ZERO),
            PriceLevel::new(huge, Decimal::ZERO),
        ];
        assert!(matches!(
            aggregate_side(Side::Asks, &levels),
            Err(DecodeError::Overflow {
                side: Side::Asks,
                index: 1
            })
        ));
    }
}
