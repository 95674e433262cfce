use hedgealpha_core::{Direction, Signal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Map a 24h percent change onto one of six bands.
///
/// Lower bounds are exclusive: a change of exactly `5` lands in `LONG`, not
/// `STRONG LONG`. Anything at or below `-5` is `STRONG SHORT`.
pub fn classify_change(change_pct: Decimal) -> Signal {
    let (direction, score) = if change_pct > dec!(5) {
        (Direction::StrongLong, 85)
    } else if change_pct > dec!(2) {
        (Direction::Long, 72)
    } else if change_pct > Decimal::ZERO {
        (Direction::NeutralLong, 58)
    } else if change_pct > dec!(-2) {
        (Direction::NeutralShort, 42)
    } else if change_pct > dec!(-5) {
        (Direction::Short, 28)
    } else {
        (Direction::StrongShort, 15)
    };
    Signal { direction, score }
}
