//! Directly-entered sufficient statistics
//!
//! Each field is kept as the text the user typed. A field that is blank, does
//! not parse, or parses to a non-finite value counts as unset; it is never
//! coerced to zero for the fit.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::engine::{fit, RegressionResult, Residuals, SufficientStats};

/// Names of the editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    N,
    SumX,
    SumY,
    SumX2,
    SumXY,
    SumResiduals,
}

impl FromStr for ManualField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "n" => Ok(ManualField::N),
            "sumx" | "sum_x" => Ok(ManualField::SumX),
            "sumy" | "sum_y" => Ok(ManualField::SumY),
            "sumx2" | "sum_x2" => Ok(ManualField::SumX2),
            "sumxy" | "sum_xy" => Ok(ManualField::SumXY),
            "rss" | "sumresiduals" | "sum_residuals" => Ok(ManualField::SumResiduals),
            other => Err(format!(
                "Unknown field: {}. Expected one of n, sumx, sumy, sumx2, sumxy, rss",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualStatistics {
    pub n: String,
    pub sum_x: String,
    pub sum_y: String,
    pub sum_x2: String,
    pub sum_xy: String,
    pub sum_residuals: String,
}

/// Parse one free-text field
pub fn parse_field(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl ManualStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ManualField, text: impl Into<String>) {
        let text = text.into();
        match field {
            ManualField::N => self.n = text,
            ManualField::SumX => self.sum_x = text,
            ManualField::SumY => self.sum_y = text,
            ManualField::SumX2 => self.sum_x2 = text,
            ManualField::SumXY => self.sum_xy = text,
            ManualField::SumResiduals => self.sum_residuals = text,
        }
    }

    pub fn get(&self, field: ManualField) -> &str {
        match field {
            ManualField::N => &self.n,
            ManualField::SumX => &self.sum_x,
            ManualField::SumY => &self.sum_y,
            ManualField::SumX2 => &self.sum_x2,
            ManualField::SumXY => &self.sum_xy,
            ManualField::SumResiduals => &self.sum_residuals,
        }
    }

    pub fn is_blank(&self) -> bool {
        [
            &self.n,
            &self.sum_x,
            &self.sum_y,
            &self.sum_x2,
            &self.sum_xy,
            &self.sum_residuals,
        ]
        .iter()
        .all(|f| f.trim().is_empty())
    }

    /// Sufficient statistics, or `None` while any required field is unset
    pub fn statistics(&self) -> Option<SufficientStats> {
        Some(SufficientStats {
            n: parse_field(&self.n)?,
            sum_x: parse_field(&self.sum_x)?,
            sum_y: parse_field(&self.sum_y)?,
            sum_x2: parse_field(&self.sum_x2)?,
            sum_xy: parse_field(&self.sum_xy)?,
        })
    }

    /// Statistics for display, with unset fields shown as zero
    pub fn display_statistics(&self) -> SufficientStats {
        SufficientStats {
            n: parse_field(&self.n).unwrap_or(0.0),
            sum_x: parse_field(&self.sum_x).unwrap_or(0.0),
            sum_y: parse_field(&self.sum_y).unwrap_or(0.0),
            sum_x2: parse_field(&self.sum_x2).unwrap_or(0.0),
            sum_xy: parse_field(&self.sum_xy).unwrap_or(0.0),
        }
    }

    /// Residual sum of squares, zero when blank
    pub fn residual_sum_of_squares(&self) -> f64 {
        parse_field(&self.sum_residuals).unwrap_or(0.0)
    }

    pub fn fit(&self) -> RegressionResult {
        match self.statistics() {
            Some(stats) => fit(&stats, Residuals::Given(self.residual_sum_of_squares())),
            None => RegressionResult::empty(),
        }
    }
}
