//! JSON output for fits and sample summaries
//!
//! Values are written unrounded; `null` marks a quantity that is not defined
//! for the current input.

use serde::Serialize;

use crate::format::DisplayFormat;
use crate::regression::{DerivedTable, InputMode, RegressionSession, SufficientStats};
use crate::sample_stats::SampleSummary;
use crate::text_output::equation;

/// Fitted parameters with their standard errors
#[derive(Debug, Clone, Serialize)]
pub struct JsonFit {
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub std_err_slope: Option<f64>,
    pub std_err_intercept: Option<f64>,
    pub residual_sum_of_squares: Option<f64>,
    /// Degenerate-fit warning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rendered line, e.g. `y = 2x + 1`
    pub equation: String,
}

/// Root JSON structure for a regression
#[derive(Debug, Clone, Serialize)]
pub struct JsonFitReport {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub mode: InputMode,
    pub display: DisplayFormat,
    pub statistics: SufficientStats,
    pub fit: JsonFit,
    /// Per-point table (point mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<DerivedTable>,
}

impl JsonFitReport {
    pub fn from_session(session: &RegressionSession, display: &DisplayFormat) -> Self {
        let result = session.result();
        let table = match session.mode() {
            InputMode::Points => Some(session.table()),
            InputMode::Manual => None,
        };
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "lsqcalc-fit-v1".to_string(),
            mode: session.mode(),
            display: *display,
            statistics: session.stats(),
            fit: JsonFit {
                slope: result.slope,
                intercept: result.intercept,
                std_err_slope: result.std_err_slope,
                std_err_intercept: result.std_err_intercept,
                residual_sum_of_squares: result.residual_sum_of_squares,
                error: result.error_message(),
                equation: equation(result, display),
            },
            table,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One summarised dataset
#[derive(Debug, Clone, Serialize)]
pub struct JsonDataset {
    pub name: String,
    #[serde(flatten)]
    pub summary: SampleSummary,
}

/// Root JSON structure for standard-error summaries
#[derive(Debug, Clone, Serialize)]
pub struct JsonSampleReport {
    pub version: String,
    pub format: String,
    pub datasets: Vec<JsonDataset>,
}

impl JsonSampleReport {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "lsqcalc-se-v1".to_string(),
            datasets: Vec::new(),
        }
    }

    pub fn add_dataset(&mut self, name: impl Into<String>, summary: SampleSummary) {
        self.datasets.push(JsonDataset {
            name: name.into(),
            summary,
        });
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonSampleReport {
    fn default() -> Self {
        Self::new()
    }
}
