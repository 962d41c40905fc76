//! Plain-text summary of a computed split.
use std::fmt::Write;

use crate::{
    BookingSettings, CalculationResult, Currency,
    money::{format_money, round_unit},
};

const BANNER: &str = "COST SPLIT SUMMARY";

/// Renders `result` as a human readable report.
pub fn summary_text(result: &CalculationResult, settings: &BookingSettings) -> String {
    let usd_decimals = if settings.round_usd { 0 } else { 2 };
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{BANNER}");
    let _ = writeln!(out, "{}", "=".repeat(BANNER.len()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Total Cost: {}", format_money(settings.total_cost, Currency::Eur, 2));
    let _ = writeln!(out, "Total Nights: {}", result.total_nights);
    let unoccupied = result.unoccupied_nights();
    if !unoccupied.is_empty() {
        let dates: Vec<String> = unoccupied.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Unoccupied Nights: {}", dates.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "PARTICIPANT BREAKDOWN:");
    let _ = writeln!(out, "{}", "-".repeat(22));

    for participant in &result.participants {
        let _ = writeln!(out, "{}:", participant.name);
        let _ = writeln!(
            out,
            "  Dates: {} - {}",
            participant.arrival_date.format("%b %d"),
            participant.departure_date.format("%b %d")
        );
        let _ = writeln!(out, "  Nights: {}", participant.nights);
        let _ = writeln!(out, "  Amount: {}", format_money(participant.amount_eur, Currency::Eur, 2));
        if settings.show_usd {
            let _ = writeln!(
                out,
                "  Amount (USD): {}",
                format_money(participant.amount_usd, Currency::Usd, usd_decimals)
            );
        }
        let _ = writeln!(
            out,
            "  Effective per night: {}",
            format_money(participant.effective_per_night_eur, Currency::Eur, 2)
        );
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "TOTAL: {}", format_money(result.total_amount_eur(), Currency::Eur, 2));
    if settings.show_usd {
        let total_usd: f64 = result
            .participants
            .iter()
            .map(|p| if settings.round_usd { round_unit(p.amount_usd) } else { p.amount_usd })
            .sum();
        let _ = writeln!(
            out,
            "TOTAL (USD): {}",
            format_money(total_usd, Currency::Usd, usd_decimals)
        );
    }
    if !result.additional_activities.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "ADDITIONAL ACTIVITIES:");
        let _ = writeln!(out, "{}", "-".repeat(22));
        for activity in &result.additional_activities {
            let _ = writeln!(
                out,
                "{} ({}): {} from {} to {}",
                activity.description,
                activity.kind.as_str(),
                format_money(activity.amount, Currency::Eur, 2),
                activity.from_participants.join(", "),
                activity.to_participants.join(", ")
            );
        }
    }

    out
}
