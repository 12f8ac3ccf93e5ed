use chrono::Duration;
use serde::Serialize;

use super::error::AnalysisError;
use super::trends::{MonthKey, MonthlyTrend};

/// Months averaged for the projection.
pub const FORECAST_WINDOW: usize = 3;

/// Where merge times are heading over the forecast window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastTrend {
    SlowingDown,
    SpeedingUp,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBasis {
    pub month: MonthKey,
    #[serde(with = "super::serde_seconds")]
    pub mean: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// The months the projection is built from, oldest first
    pub basis: Vec<ForecastBasis>,
    /// Expected mean merge time for the next period
    #[serde(with = "super::serde_seconds")]
    pub projected: Duration,
    pub trend: ForecastTrend,
}

/// Classify the move from `first` to `last` against a 10% band around `first`.
pub fn classify_trend(first: Duration, last: Duration) -> ForecastTrend {
    let diff = last - first;
    let threshold = first / 10;
    if diff > threshold {
        ForecastTrend::SlowingDown
    } else if diff < -threshold {
        ForecastTrend::SpeedingUp
    } else {
        ForecastTrend::Stable
    }
}

/// Three-month moving-average projection over chronologically ordered trends.
///
/// # Errors
///
/// [`AnalysisError::InsufficientHistory`] with fewer than three months.
pub fn forecast(trends: &[MonthlyTrend]) -> Result<Forecast, AnalysisError> {
    if trends.len() < FORECAST_WINDOW {
        return Err(AnalysisError::InsufficientHistory {
            months: trends.len(),
            required: FORECAST_WINDOW,
        });
    }

    let window = &trends[trends.len() - FORECAST_WINDOW..];
    let total = window.iter().fold(Duration::zero(), |acc, t| acc + t.mean);
    let first = window[0].mean;
    let last = window[FORECAST_WINDOW - 1].mean;

    Ok(Forecast {
        basis: window
            .iter()
            .map(|t| ForecastBasis {
                month: t.month,
                mean: t.mean,
            })
            .collect(),
        projected: total / FORECAST_WINDOW as i32,
        trend: classify_trend(first, last),
    })
}
