use crate::models::{CompositeRow, ExecutiveSummary, MetricDelta, SignalError};

pub const YOY_LOOKBACK: usize = 12;
/// Velocity above this reads as "high movement" in the summary.
pub const HIGH_MOVEMENT_VELOCITY: f64 = 1.2;

/// Executive snapshot of the latest month. Comparators degrade gracefully:
/// with one period the prior month is the latest itself, and with fewer than
/// 13 periods the prior year falls back to the earliest row, so deltas
/// compute as 0% instead of erroring.
pub fn summarize(rows: &[CompositeRow]) -> Result<ExecutiveSummary, SignalError> {
    let latest = rows.last().ok_or(SignalError::EmptyDataset)?;
    let prev_month = if rows.len() > 1 {
        &rows[rows.len() - 2]
    } else {
        latest
    };
    let prev_year = if rows.len() > YOY_LOOKBACK {
        &rows[rows.len() - YOY_LOOKBACK]
    } else {
        &rows[0]
    };

    let epi = latest.employer_power_index;
    let velocity = latest.talent_velocity;

    Ok(ExecutiveSummary {
        date: latest.row.date,
        market_state: latest.market_state,
        hiring_outlook: latest.hiring_outlook,
        retention_risk: latest.retention_risk,
        employer_power_index: MetricDelta {
            value: epi,
            mom_change: relative_change(epi, prev_month.employer_power_index),
            yoy_change: relative_change(epi, prev_year.employer_power_index),
            interpretation: epi.map(|epi| {
                if epi > 1.0 {
                    "Employer advantage".to_string()
                } else {
                    "Employee advantage".to_string()
                }
            }),
        },
        talent_velocity: MetricDelta {
            value: velocity,
            mom_change: relative_change(velocity, prev_month.talent_velocity),
            yoy_change: relative_change(velocity, prev_year.talent_velocity),
            interpretation: velocity.map(|velocity| {
                if velocity > HIGH_MOVEMENT_VELOCITY {
                    "High movement".to_string()
                } else {
                    "Stable market".to_string()
                }
            }),
        },
        unemployment_rate: MetricDelta {
            value: latest.row.unemp_rate,
            mom_change: point_change(latest.row.unemp_rate, prev_month.row.unemp_rate),
            yoy_change: point_change(latest.row.unemp_rate, prev_year.row.unemp_rate),
            interpretation: None,
        },
    })
}

fn relative_change(current: Option<f64>, prior: Option<f64>) -> f64 {
    match (current, prior) {
        (Some(current), Some(prior)) if prior != 0.0 => (current / prior - 1.0) * 100.0,
        _ => 0.0,
    }
}

fn point_change(current: Option<f64>, prior: Option<f64>) -> f64 {
    match (current, prior) {
        (Some(current), Some(prior)) => current - prior,
        _ => 0.0,
    }
}
