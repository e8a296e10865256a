use crate::models::{CompositeRow, TrendSignals};

pub const DEFAULT_TREND_WINDOW: usize = 6;
pub const QUITS_MOMENTUM_SPAN: usize = 3;

// Alert thresholds are fixed design constants; callers needing different
// sensitivity fork the detector rather than tune it.
pub const UNEMP_TREND_PP: f64 = 0.5;
pub const QUITS_MOMENTUM_PCT: f64 = 0.10;
pub const TIGHTNESS_PCT: f64 = 0.15;
pub const EPI_ALERT_PCT: f64 = 10.0;
pub const UNEMP_ALERT_PP: f64 = 0.3;
pub const QUITS_ALERT_PCT: f64 = 5.0;

/// Scan the trailing window (narrowed to the available history) for
/// significant oldest-versus-newest moves and emit one signal per condition.
pub fn detect_trends(rows: &[CompositeRow], window: usize) -> TrendSignals {
    let recent = &rows[rows.len().saturating_sub(window.max(1))..];
    let mut signals = Vec::new();

    if let (Some(first), Some(last)) = (recent.first(), recent.last()) {
        if let (Some(start), Some(end)) = (first.row.unemp_rate, last.row.unemp_rate) {
            let change = end - start;
            if change.abs() > UNEMP_TREND_PP {
                let direction = if change > 0.0 { "rising" } else { "falling" };
                signals.push(format!("Unemployment {direction} ({change:+.1}pp)"));
            }
        }

        if recent.len() > QUITS_MOMENTUM_SPAN {
            let latest = last.row.quits_index;
            let prior = recent[recent.len() - 1 - QUITS_MOMENTUM_SPAN].row.quits_index;
            if let (Some(latest), Some(prior)) = (latest, prior) {
                if prior != 0.0 {
                    let change = latest / prior - 1.0;
                    if change.abs() > QUITS_MOMENTUM_PCT {
                        let direction = if change > 0.0 {
                            "accelerating"
                        } else {
                            "decelerating"
                        };
                        signals.push(format!(
                            "Quit rate {} ({:+.0}%)",
                            direction,
                            change * 100.0
                        ));
                    }
                }
            }
        }

        if let (Some(start), Some(end)) = (tightness_ratio(first), tightness_ratio(last)) {
            if start != 0.0 {
                let change = end / start - 1.0;
                if change.abs() > TIGHTNESS_PCT {
                    let direction = if change > 0.0 { "tightening" } else { "loosening" };
                    signals.push(format!(
                        "Labor market {} ({:+.0}%)",
                        direction,
                        change * 100.0
                    ));
                }
            }
        }
    }

    let summary = if signals.is_empty() {
        "Market conditions stable".to_string()
    } else {
        signals.join(" | ")
    };

    TrendSignals { signals, summary }
}

/// Alerts comparing only the two most recent periods.
pub fn latest_alerts(rows: &[CompositeRow]) -> Vec<String> {
    let mut alerts = Vec::new();
    let [.., prev, latest] = rows else {
        return alerts;
    };

    if let (Some(current), Some(prior)) = (latest.employer_power_index, prev.employer_power_index)
    {
        if prior != 0.0 {
            let change = (current / prior - 1.0) * 100.0;
            if change.abs() > EPI_ALERT_PCT {
                let direction = if change > 0.0 {
                    "shifted toward employers"
                } else {
                    "shifted toward employees"
                };
                alerts.push(format!(
                    "Market power has {} by {:.1}% this month",
                    direction,
                    change.abs()
                ));
            }
        }
    }

    if let (Some(current), Some(prior)) = (latest.row.unemp_rate, prev.row.unemp_rate) {
        let change = current - prior;
        if change.abs() > UNEMP_ALERT_PP {
            let direction = if change > 0.0 { "increased" } else { "decreased" };
            alerts.push(format!(
                "Unemployment rate {} by {:.1} percentage points",
                direction,
                change.abs()
            ));
        }
    }

    if let (Some(current), Some(prior)) = (latest.row.quits_index, prev.row.quits_index) {
        if prior != 0.0 {
            let change = (current / prior - 1.0) * 100.0;
            if change.abs() > QUITS_ALERT_PCT {
                let direction = if change > 0.0 { "surged" } else { "dropped" };
                alerts.push(format!("Quit rates have {} by {:.1}%", direction, change.abs()));
            }
        }
    }

    alerts
}

fn tightness_ratio(row: &CompositeRow) -> Option<f64> {
    let openings = row.row.job_openings_index?;
    let unemp = row.row.unemp_rate?;
    if unemp == 0.0 {
        None
    } else {
        Some(openings / unemp)
    }
}
