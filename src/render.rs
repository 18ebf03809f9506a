//! Text table rendering of a [DepthWindow] and its sums.
//!
//! ```text
//!                                                 ETHBTC
//!                       BIDS                                       ASKS
//!            price     amount       total                price     amount       total
//!          0.05320   1.20000      0.06384              0.05321   0.40000      0.02128
//!
//! Sums     0.05320   1.20000      0.06384              0.05321   0.40000      0.02128
//! ```
//!
//! Numbers have 5 decimal places, price and total columns are 12 wide and amount
//! columns 9 wide. A side with fewer levels than the other is left blank on the
//! remaining rows.

use std::fmt::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::messages::{DepthWindow, PriceLevel, RenderedFrame, SideAggregate};

const DECIMALS: u32 = 5;
const PRICE_WIDTH: usize = 12;
const AMOUNT_WIDTH: usize = 9;
const TOTAL_WIDTH: usize = 12;
const SIDE_WIDTH: usize = PRICE_WIDTH + 1 + AMOUNT_WIDTH + 1 + TOTAL_WIDTH;

const SYMBOL_INDENT: &str = "\t\t\t\t\t\t ";
const SIDES_HEADER: &str = "\t\t      BIDS \t\t\t\t\t         ASKS";
const COLUMNS_HEADER: &str =
    "           price     amount       total \t\t       price     amount       total";
const ROW_INDENT: &str = "     ";
const SUMS_LABEL: &str = "Sums ";
const SIDE_GAP: &str = " \t\t ";

/// Render one frame. `symbol` is shown uppercased.
pub fn render(
    symbol: &str,
    window: &DepthWindow,
    bid_aggregate: &SideAggregate,
    ask_aggregate: &SideAggregate,
) -> RenderedFrame {
    let mut out = String::with_capacity(128 * (window.rows() + 5));
    // writing to a String never fails
    let _ = writeln!(out, "{SYMBOL_INDENT}{}", symbol.to_uppercase());
    let _ = writeln!(out, "{SIDES_HEADER}");
    let _ = writeln!(out, "{COLUMNS_HEADER}");

    for i in 0..window.rows() {
        let _ = writeln!(
            out,
            "{ROW_INDENT}{}{SIDE_GAP}{}",
            level_columns(window.bids.get(i)),
            level_columns(window.asks.get(i)),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{SUMS_LABEL}{}{SIDE_GAP}{}",
        columns(
            bid_aggregate.price_sum,
            bid_aggregate.amount_sum,
            bid_aggregate.notional_sum
        ),
        columns(
            ask_aggregate.price_sum,
            ask_aggregate.amount_sum,
            ask_aggregate.notional_sum
        ),
    );
    RenderedFrame::new(out)
}

fn level_columns(level: Option<&PriceLevel>) -> String {
    match level {
        // the aggregator has already rejected levels whose notional overflows
        Some(level) => columns(level.price, level.amount, level.notional().unwrap_or_default()),
        None => " ".repeat(SIDE_WIDTH),
    }
}

fn columns(price: Decimal, amount: Decimal, total: Decimal) -> String {
    format!(
        "{:>pw$.dp$} {:>aw$.dp$} {:>tw$.dp$}",
        round(price),
        round(amount),
        round(total),
        pw = PRICE_WIDTH,
        aw = AMOUNT_WIDTH,
        tw = TOTAL_WIDTH,
        dp = DECIMALS as usize,
    )
}

fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::aggregator::aggregate;

    fn sample_window() -> DepthWindow {
        DepthWindow {
            bids: vec![
                PriceLevel::new(dec!(100.0), dec!(1.0)),
                PriceLevel::new(dec!(99.0), dec!(2.0)),
            ],
            asks: vec![PriceLevel::new(dec!(101.0), dec!(1.5))],
        }
    }

    #[test]
    fn render_uneven_sides() {
        let window = sample_window();
        let (bids, asks) = aggregate(&window).unwrap();
        let frame = render("btcusdt", &window, &bids, &asks);
        let lines: Vec<&str> = frame.as_str().lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "\t\t\t\t\t\t BTCUSDT");
        assert_eq!(lines[1], SIDES_HEADER);
        assert_eq!(lines[2], COLUMNS_HEADER);
        assert_eq!(
            lines[3],
            "        100.00000   1.00000    100.00000 \t\t    101.00000   1.50000    151.50000"
        );
        assert_eq!(
            lines[4],
            format!("         99.00000   2.00000    198.00000 \t\t {}", " ".repeat(SIDE_WIDTH))
        );
        assert_eq!(lines[5], "");
        assert_eq!(
            lines[6],
            "Sums    199.00000   3.00000    298.00000 \t\t    101.00000   1.50000    151.50000"
        );
        assert!(frame.as_str().ends_with('\n'));
    }

    #[test]
    fn blank_bid_columns_when_asks_are_deeper() {
        let window = DepthWindow {
            bids: vec![],
            asks: vec![
                PriceLevel::new(dec!(1), dec!(1)),
                PriceLevel::new(dec!(2), dec!(1)),
            ],
        };
        let (bids, asks) = aggregate(&window).unwrap();
        let frame = render("x", &window, &bids, &asks);
        let rows: Vec<&str> = frame.as_str().lines().skip(3).take(2).collect();
        for row in rows {
            assert!(row.starts_with(&format!("{ROW_INDENT}{}{SIDE_GAP}", " ".repeat(SIDE_WIDTH))));
        }
        assert!(frame.as_str().contains(
            "Sums      0.00000   0.00000      0.00000 \t\t      3.00000   2.00000      3.00000"
        ));
    }

    #[test]
    fn empty_window_renders_headers_and_zero_sums() {
        let window = DepthWindow::default();
        let (bids, asks) = aggregate(&window).unwrap();
        let frame = render("ethbtc", &window, &bids, &asks);
        assert_eq!(frame.as_str().lines().count(), 5);
    }

    #[test]
    fn values_are_rounded_to_five_places() {
        assert_eq!(
            columns(dec!(0.123456), dec!(0.000005), dec!(1)),
            "     0.12346   0.00001      1.00000"
        );
    }

    #[test]
    fn wide_prices_do_not_collide() {
        let row = columns(dec!(1234567.5), dec!(1000), dec!(1234567500));
        assert_eq!(row, "1234567.50000 1000.00000 1234567500.00000");
    }
}
