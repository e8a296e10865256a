use std::fmt::Write;

use crate::classify;
use crate::models::{CompositeRow, ExecutiveSummary, TrendSignals};

fn score(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    }
}

fn label<T: std::fmt::Display>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "UNCLASSIFIED".to_string(),
    }
}

pub fn build_report(
    summary: &ExecutiveSummary,
    rows: &[CompositeRow],
    trends: &TrendSignals,
    alerts: &[String],
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Labor Market Conditions Report");
    let _ = writeln!(output, "Generated for {}", summary.date.format("%B %Y"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Market State");
    let _ = writeln!(output, "- State: {}", label(summary.market_state));
    let _ = writeln!(output, "- Hiring outlook: {}", label(summary.hiring_outlook));
    let _ = writeln!(output, "- Retention risk: {}", label(summary.retention_risk));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Metrics");
    let epi = &summary.employer_power_index;
    let _ = writeln!(
        output,
        "- Employer power index {} (MoM {:+.1}%, YoY {:+.1}%){}",
        score(epi.value),
        epi.mom_change,
        epi.yoy_change,
        epi.interpretation
            .as_deref()
            .map(|text| format!(" - {text}"))
            .unwrap_or_default()
    );
    let velocity = &summary.talent_velocity;
    let _ = writeln!(
        output,
        "- Talent velocity {} (MoM {:+.1}%, YoY {:+.1}%){}",
        score(velocity.value),
        velocity.mom_change,
        velocity.yoy_change,
        velocity
            .interpretation
            .as_deref()
            .map(|text| format!(" - {text}"))
            .unwrap_or_default()
    );
    let unemp = &summary.unemployment_rate;
    let _ = writeln!(
        output,
        "- Unemployment rate {} (MoM {:+.1}pp, YoY {:+.1}pp)",
        match unemp.value {
            Some(value) => format!("{value:.1}%"),
            None => "n/a".to_string(),
        },
        unemp.mom_change,
        unemp.yoy_change
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend Signals");
    if trends.signals.is_empty() {
        let _ = writeln!(output, "{}", trends.summary);
    } else {
        for signal in trends.signals.iter() {
            let _ = writeln!(output, "- {signal}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");
    if alerts.is_empty() {
        let _ = writeln!(output, "No significant market disruptions detected.");
    } else {
        for alert in alerts.iter() {
            let _ = writeln!(output, "- {alert}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    let classification = match (epi.value, velocity.value) {
        (Some(epi), Some(velocity)) => classify::classify(epi, velocity).ok(),
        _ => None,
    };
    match classification {
        Some(classification) if !classification.recommendations.is_empty() => {
            for action in classification.immediate_actions() {
                let _ = writeln!(output, "- Now: {action}");
            }
            for consideration in classification.planning_considerations() {
                let _ = writeln!(output, "- Plan: {consideration}");
            }
        }
        Some(_) => {
            let _ = writeln!(output, "No action required; market is balanced.");
        }
        None => {
            let _ = writeln!(output, "Not enough classified data.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Months");
    let start = rows.len().saturating_sub(6);
    for row in rows[start..].iter() {
        let _ = writeln!(
            output,
            "- {}: EPI {}, velocity {}, {}",
            row.row.date.format("%Y-%m"),
            score(row.employer_power_index),
            score(row.talent_velocity),
            label(row.market_state)
        );
    }

    output
}
