//! Per-point derivation table and calculation breakdown
//!
//! The table (X, Y, X², XY, residual²) is a pure function of the points and the
//! fitted line. It is also the exact row shape used for CSV and clipboard export.

use serde::Serialize;

use super::engine::{RegressionResult, SufficientStats};
use super::points::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based row number
    pub no: usize,
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub xy: f64,
    pub residual_sq: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TableTotals {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub xy: f64,
    pub residual_sq: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedTable {
    pub rows: Vec<TableRow>,
    pub totals: TableTotals,
}

impl DerivedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the table for `points` against the line `slope·x + intercept`
///
/// Residual columns are `None` unless both parameters are known.
pub fn derive_table(points: &[Point], slope: Option<f64>, intercept: Option<f64>) -> DerivedTable {
    let line = slope.zip(intercept);

    let rows: Vec<TableRow> = points
        .iter()
        .enumerate()
        .map(|(i, p)| TableRow {
            no: i + 1,
            x: p.x,
            y: p.y,
            x2: p.x * p.x,
            xy: p.x * p.y,
            residual_sq: line.map(|(a, b)| {
                let r = p.y - (a * p.x + b);
                r * r
            }),
        })
        .collect();

    let mut totals = TableTotals {
        residual_sq: line.map(|_| 0.0),
        ..TableTotals::default()
    };
    for row in &rows {
        totals.x += row.x;
        totals.y += row.y;
        totals.x2 += row.x2;
        totals.xy += row.xy;
        totals.residual_sq = totals.residual_sq.zip(row.residual_sq).map(|(s, r)| s + r);
    }

    DerivedTable { rows, totals }
}

/// Convenience wrapper taking the fit result
pub fn derive_table_for(points: &[Point], result: &RegressionResult) -> DerivedTable {
    derive_table(points, result.slope, result.intercept)
}

/// Intermediate quantities of the closed-form fit, for showing the working
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormulaBreakdown {
    pub stats: SufficientStats,
    /// n·ΣX² − (ΣX)²
    pub denominator: f64,
    /// n·ΣXY − ΣX·ΣY
    pub slope_numerator: f64,
    /// ΣX²·ΣY − ΣXY·ΣX
    pub intercept_numerator: f64,
    pub residual_sum_of_squares: f64,
    /// RSS / (n − 2), zero when n ≤ 2
    pub residual_variance: f64,
    /// D / n
    pub sxx: f64,
}

impl FormulaBreakdown {
    pub fn from_stats(stats: &SufficientStats, residual_sum_of_squares: f64) -> Option<Self> {
        let n = stats.n;
        if n == 0.0 || !n.is_finite() {
            return None;
        }
        let denominator = stats.denominator();
        Some(Self {
            stats: *stats,
            denominator,
            slope_numerator: n * stats.sum_xy - stats.sum_x * stats.sum_y,
            intercept_numerator: stats.sum_x2 * stats.sum_y - stats.sum_xy * stats.sum_x,
            residual_sum_of_squares,
            residual_variance: if n > 2.0 {
                residual_sum_of_squares / (n - 2.0)
            } else {
                0.0
            },
            sxx: denominator / n,
        })
    }
}
