use std::fmt::Write;

use crate::core::{AgeSnapshot, Report, SAFE_RUIN_RATE};

/// Plain-text summary printed by the `simulate` command.
pub fn render_text(
    report: &Report,
    snapshot_retire_age: i32,
    snapshots: &[AgeSnapshot],
) -> String {
    let mut out = String::new();
    let recommended = &report.projections.recommended;

    if !snapshots.is_empty() {
        let _ = writeln!(
            out,
            "Asset distribution when working until {snapshot_retire_age}:"
        );
        let _ = writeln!(out, "{:>5} {:>12} {:>12} {:>12}", "age", "p10", "p50", "p90");
        for s in snapshots {
            let _ = writeln!(
                out,
                "{:>5} {:>12.2} {:>12.2} {:>12.2}",
                s.age, s.p10, s.p50, s.p90
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Ruin probability by retirement age:");
    for r in &report.ruin_rates {
        let marker = if r.age == recommended.retire_age { " <" } else { "" };
        let _ = writeln!(out, "{:>5} {:>7.2}%{marker}", r.age, r.rate);
    }
    out.push('\n');

    let recommended_rate = report
        .ruin_rates
        .iter()
        .find(|r| r.age == recommended.retire_age)
        .map(|r| r.rate);
    match recommended_rate {
        Some(rate) if rate < SAFE_RUIN_RATE => {
            let _ = writeln!(
                out,
                "Recommended retirement age: {} \
                 (ruin probability {rate:.2}%, below {SAFE_RUIN_RATE}%)",
                recommended.retire_age
            );
        }
        _ => {
            let last = report.ruin_rates.last().map(|r| r.age).unwrap_or(0);
            let _ = writeln!(
                out,
                "No retirement age up to {last} keeps ruin probability below {SAFE_RUIN_RATE}%; \
                 lowest risk at {}. Consider saving more or spending less.",
                recommended.retire_age
            );
        }
    }

    if let (Some(p10), Some(p50), Some(p90)) = (
        recommended.p10.last(),
        recommended.p50.last(),
        recommended.p90.last(),
    ) {
        let end_age = recommended.ages.last().copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "Assets at {end_age}: p10 {p10:.2}, p50 {p50:.2}, p90 {p90:.2}"
        );
    }

    out
}
