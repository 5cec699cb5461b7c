use crate::apy::HistoricalApy;

/// Format a rate as a percentage with two decimal places, e.g. `0.0512` → `5.12%`.
pub fn format_percent(value: f64) -> String { format!("{:.2}%", value * 100.0) }

pub fn format_historical(value: HistoricalApy) -> String {
    match value {
        HistoricalApy::Known(value) => format_percent(value),
        HistoricalApy::Suppressed => "--%".to_string(),
    }
}

/// Format a USD amount, abbreviated with K/M/B/T suffixes.
pub fn format_usd(amount: f64) -> String {
    if amount < 1e3 {
        format!("${amount:.2}")
    } else if amount < 1e6 {
        format!("${:.2}K", amount / 1e3)
    } else if amount < 1e9 {
        format!("${:.2}M", amount / 1e6)
    } else if amount < 1e12 {
        format!("${:.2}B", amount / 1e9)
    } else {
        format!("${:.1}T", amount / 1e12)
    }
}
