use crate::levels::{RiskGuidance, TradeLevels};
use hedgealpha_core::{round_half_away, PriceSnapshot, Signal, Tier};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt::Write;

pub const DISCLAIMER: &str = "NOT FINANCIAL ADVICE. For informational purposes only.";

const FREE_NOTE: &str = "[FREE TRIAL QUERY - Subsequent queries require payment]";

/// Everything a text report needs.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub snapshot: &'a PriceSnapshot,
    pub tier: Tier,
    pub timeframe: &'a str,
    pub signal: Signal,
    pub free_query: bool,
}

/// Render the human-readable report carried in a signal response.
pub fn render_report(ctx: &ReportContext<'_>) -> String {
    let snap = ctx.snapshot;
    let header = format!(
        "[{}] - {} ({})",
        snap.asset_class.label(),
        snap.symbol,
        ctx.timeframe
    );
    let price = format_price(snap.price);
    let change = format!("{:.2}", snap.change_24h_display());
    let mut out = String::new();

    // `write!` into a String cannot fail.
    match ctx.tier {
        Tier::Sentiment => {
            let _ = writeln!(out, "SENTIMENT SIGNAL {header}");
            let _ = writeln!(out, "Current Price: ${price}");
            let _ = writeln!(out, "24h Change: {change}%");
            let _ = writeln!(out, "Sentiment Score: {}/100", ctx.signal.score);
            let _ = write!(out, "Signal: {}", ctx.signal.direction);
            if ctx.free_query {
                let _ = write!(out, "\n{FREE_NOTE}");
            }
        }
        Tier::FullAlpha => {
            let levels = TradeLevels::from_price(snap.price);
            let _ = writeln!(out, "FULL ALPHA SIGNAL {header}\n");
            let _ = writeln!(out, "Current Price: ${price}");
            let _ = writeln!(out, "24h Change: {change}%");
            let _ = writeln!(out, "Sentiment: {}/100", ctx.signal.score);
            let _ = writeln!(out, "Direction: {}", ctx.signal.direction);
            write_levels(&mut out, &levels);
            let _ = write!(out, "Stop Loss: ${} (-5%)", format_price(levels.stop_loss));
        }
        Tier::Premium => {
            let levels = TradeLevels::from_price(snap.price);
            let guidance = RiskGuidance::default();
            let cap_billions = snap.market_cap / dec!(1_000_000_000);
            let _ = writeln!(out, "PREMIUM ALPHA SIGNAL {header}\n");
            let _ = writeln!(out, "=== MARKET DATA ===");
            let _ = writeln!(out, "Current Price: ${price}");
            let _ = writeln!(out, "24h Change: {change}%");
            let _ = writeln!(out, "Market Cap: ${cap_billions:.2}B\n");
            let _ = writeln!(out, "=== THESIS ===");
            let _ = writeln!(out, "Sentiment: {}/100", ctx.signal.score);
            let _ = writeln!(out, "Direction: {}", ctx.signal.direction);
            write_levels(&mut out, &levels);
            let _ = writeln!(out);
            let _ = writeln!(out, "=== RISK ASSESSMENT ===");
            let _ = writeln!(out, "Stop Loss: ${} (-5%)", format_price(levels.stop_loss));
            let _ = writeln!(out, "Position Size: {}", guidance.position_size);
            let _ = write!(out, "Risk/Reward: {}", guidance.risk_reward);
        }
    }

    let _ = write!(out, "\n\n{DISCLAIMER}");
    out
}

fn write_levels(out: &mut String, levels: &TradeLevels) {
    let _ = writeln!(
        out,
        "Entry Zone: ${} - ${}",
        format_price(levels.entry_low),
        format_price(levels.entry_high)
    );
    let _ = writeln!(out, "Target: ${} (+10%)", format_price(levels.target));
}

/// Format a USD price with thousands separators.
///
/// Prices of at least one dollar keep two decimals; sub-dollar prices keep six.
pub fn format_price(price: Decimal) -> String {
    let dp = if price.abs() >= Decimal::ONE { 2 } else { 6 };
    let rounded = round_half_away(price, dp).normalize();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
