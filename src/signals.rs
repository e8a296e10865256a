use crate::classify;
use crate::models::{CompositeRow, PeriodRow, SignalError};

/// Neutral value for an index series that is absent from the dataset.
pub const NEUTRAL_INDEX: f64 = 100.0;
/// Wage-growth proxy applied when a year-over-year CPI change is undefined.
pub const DEFAULT_WAGE_GROWTH: f64 = 0.02;
/// Momentum contribution is clamped to +/-50%.
pub const MOMENTUM_CLAMP: f64 = 0.5;
pub const VELOCITY_WINDOW: usize = 3;
pub const MOMENTUM_SPAN: usize = 3;
pub const YOY_SPAN: usize = 12;

/// Employer Power Index per period. Higher than 1.0 means conditions favor
/// employers, lower favors employees.
///
/// The final step divides every raw ratio by the median of all raw ratios in
/// the dataset, so the score for any period depends on the full window passed
/// in: appending new periods retroactively shifts historical values. This is
/// intentional (it keeps 1.0 meaning "balanced" for the loaded range) and is
/// asserted by a test rather than hidden.
pub fn employer_power_index(rows: &[PeriodRow]) -> Vec<Option<f64>> {
    let raw: Vec<Option<f64>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let unemp = row.unemp_rate?;
            let seekers_per_opening = match row.job_openings_index {
                Some(openings) if openings != 0.0 => unemp / (openings / NEUTRAL_INDEX),
                _ => unemp,
            };
            let quits_factor = row.quits_index.unwrap_or(NEUTRAL_INDEX) / NEUTRAL_INDEX;
            let wage_growth_proxy = 1.0 + yoy_change(rows, i).unwrap_or(DEFAULT_WAGE_GROWTH);

            let mut denominator = quits_factor * wage_growth_proxy;
            if denominator == 0.0 {
                denominator = 1.0;
            }
            Some(unemp * seekers_per_opening / denominator)
        })
        .collect();

    let mut observed: Vec<f64> = raw.iter().flatten().copied().collect();
    let med = median(&mut observed);

    raw.iter()
        .map(|value| match (value, med) {
            (Some(value), Some(med)) if med != 0.0 => Some(value / med),
            _ => None,
        })
        .collect()
}

/// Talent velocity per period: trailing mean of combined quits and hires
/// movement, scaled by clamped 3-period momentum. The trailing window narrows
/// at the start of the series, so every period gets a value.
pub fn talent_velocity(rows: &[PeriodRow]) -> Vec<f64> {
    let movement: Vec<f64> = rows
        .iter()
        .map(|row| {
            let quits = row.quits_index.unwrap_or(NEUTRAL_INDEX) / NEUTRAL_INDEX;
            let hires = row.hires_index.unwrap_or(NEUTRAL_INDEX) / NEUTRAL_INDEX;
            (quits + hires) / 2.0
        })
        .collect();

    movement
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = (i + 1).saturating_sub(VELOCITY_WINDOW);
            let window = &movement[start..=i];
            let velocity_base = window.iter().sum::<f64>() / window.len() as f64;

            let momentum = if i >= MOMENTUM_SPAN && movement[i - MOMENTUM_SPAN] != 0.0 {
                (movement[i] / movement[i - MOMENTUM_SPAN] - 1.0)
                    .clamp(-MOMENTUM_CLAMP, MOMENTUM_CLAMP)
            } else {
                0.0
            };

            velocity_base * (1.0 + momentum)
        })
        .collect()
}

/// Map every period row to a composite row. A row receives either both
/// composite scores or neither, and classification fields only when both
/// scores are present.
pub fn compute_signals(rows: &[PeriodRow]) -> Result<Vec<CompositeRow>, SignalError> {
    if rows.is_empty() {
        return Err(SignalError::EmptyDataset);
    }

    let epi = employer_power_index(rows);
    let velocity = talent_velocity(rows);

    let composites = rows
        .iter()
        .zip(epi)
        .zip(velocity)
        .map(|((row, epi), velocity)| match epi {
            Some(epi) if epi.is_finite() && velocity.is_finite() => {
                let classification = classify::classify(epi, velocity).ok();
                CompositeRow {
                    row: row.clone(),
                    employer_power_index: Some(epi),
                    talent_velocity: Some(velocity),
                    market_state: classification.as_ref().map(|c| c.state),
                    hiring_outlook: classification.as_ref().map(|c| c.hiring_outlook),
                    retention_risk: classification.as_ref().map(|c| c.retention_risk),
                }
            }
            _ => CompositeRow {
                row: row.clone(),
                employer_power_index: None,
                talent_velocity: None,
                market_state: None,
                hiring_outlook: None,
                retention_risk: None,
            },
        })
        .collect();

    Ok(composites)
}

fn yoy_change(rows: &[PeriodRow], i: usize) -> Option<f64> {
    if i < YOY_SPAN {
        return None;
    }
    let current = rows[i].cpi_index?;
    let base = rows[i - YOY_SPAN].cpi_index?;
    if base == 0.0 {
        return None;
    }
    Some(current / base - 1.0)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}
