use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("dataset contains no parseable rows")]
    EmptyDataset,
    #[error("cannot classify non-finite scores (epi {epi}, velocity {velocity})")]
    InvalidScore { epi: f64, velocity: f64 },
}

/// Tracked series, keyed by their provider codes in the raw feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    UnemploymentRate,
    JobOpenings,
    Hires,
    Quits,
    Cpi,
}

impl Series {
    pub fn from_code(code: &str) -> Option<Series> {
        match code {
            "UNRATE" => Some(Series::UnemploymentRate),
            "JTSJOL" => Some(Series::JobOpenings),
            "JTSHIL" => Some(Series::Hires),
            "JTSQUL" => Some(Series::Quits),
            "CPIAUCSL" => Some(Series::Cpi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Observation {
    pub series: Series,
    pub date: NaiveDate,
    pub value: f64,
}

/// One calendar month of aligned metrics. `unemp_rate` stays in raw percent;
/// the remaining series are indices rebased to 100 at the baseline month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRow {
    pub date: NaiveDate,
    pub unemp_rate: Option<f64>,
    pub job_openings_index: Option<f64>,
    pub hires_index: Option<f64>,
    pub quits_index: Option<f64>,
    pub cpi_index: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeRow {
    #[serde(flatten)]
    pub row: PeriodRow,
    pub employer_power_index: Option<f64>,
    pub talent_velocity: Option<f64>,
    pub market_state: Option<MarketState>,
    pub hiring_outlook: Option<HiringOutlook>,
    pub retention_risk: Option<RetentionRisk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketState {
    #[serde(rename = "EMPLOYER'S MARKET")]
    EmployersMarket,
    #[serde(rename = "EMPLOYEE'S MARKET")]
    EmployeesMarket,
    #[serde(rename = "TRANSITIONING")]
    Transitioning,
}

impl std::fmt::Display for MarketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MarketState::EmployersMarket => "EMPLOYER'S MARKET",
            MarketState::EmployeesMarket => "EMPLOYEE'S MARKET",
            MarketState::Transitioning => "TRANSITIONING",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HiringOutlook {
    Favorable,
    Balanced,
    Challenging,
}

impl std::fmt::Display for HiringOutlook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HiringOutlook::Favorable => "FAVORABLE",
            HiringOutlook::Balanced => "BALANCED",
            HiringOutlook::Challenging => "CHALLENGING",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RetentionRisk {
    Elevated,
    Normal,
    Low,
}

impl std::fmt::Display for RetentionRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RetentionRisk::Elevated => "ELEVATED",
            RetentionRisk::Normal => "NORMAL",
            RetentionRisk::Low => "LOW",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Volatility {
    High,
    Moderate,
    Low,
}

impl std::fmt::Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Volatility::High => "HIGH",
            Volatility::Moderate => "MODERATE",
            Volatility::Low => "LOW",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub state: MarketState,
    pub hiring_outlook: HiringOutlook,
    pub hiring_score: f64,
    pub retention_risk: RetentionRisk,
    pub volatility: Volatility,
    pub epi: f64,
    pub velocity: f64,
    pub recommendations: Vec<String>,
}

impl Classification {
    pub fn immediate_actions(&self) -> &[String] {
        let split = self.recommendations.len().min(2);
        &self.recommendations[..split]
    }

    pub fn planning_considerations(&self) -> &[String] {
        let split = self.recommendations.len().min(2);
        &self.recommendations[split..]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSignals {
    pub signals: Vec<String>,
    pub summary: String,
}

/// Latest value of one metric with month-over-month and year-over-year
/// deltas. Deltas are relative percent for the composite scores and
/// percentage points for the unemployment rate.
#[derive(Debug, Clone, Serialize)]
pub struct MetricDelta {
    pub value: Option<f64>,
    pub mom_change: f64,
    pub yoy_change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutiveSummary {
    pub date: NaiveDate,
    pub market_state: Option<MarketState>,
    pub hiring_outlook: Option<HiringOutlook>,
    pub retention_risk: Option<RetentionRisk>,
    pub employer_power_index: MetricDelta,
    pub talent_velocity: MetricDelta,
    pub unemployment_rate: MetricDelta,
}
