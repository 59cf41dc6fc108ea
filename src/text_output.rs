//! Human-readable rendering
//!
//! Every number passes through the [`DisplayFormat`] handed in by the caller,
//! so a format change shows up on the next render.

use std::fmt::Write as _;

use crate::format::{DisplayFormat, Rounded};
use crate::regression::{
    DerivedTable, FormulaBreakdown, Point, RegressionResult, SufficientStats,
};
use crate::sample_stats::{SampleDataset, SampleSummary};

/// Digits used for the standard-error calculator, independent of the user setting
pub const SAMPLE_DIGITS: u32 = 6;

/// Placeholder equation shown before a line exists
pub const EQUATION_PLACEHOLDER: &str = "y = ax + b";

/// `y = ax + b` with the intercept sign folded into the operator
pub fn equation(result: &RegressionResult, display: &DisplayFormat) -> String {
    match (result.slope, result.intercept) {
        (Some(slope), Some(intercept)) => {
            let sign = if intercept >= 0.0 { '+' } else { '-' };
            format!(
                "y = {}x {} {}",
                display.round_value(slope),
                sign,
                display.round_value(intercept.abs())
            )
        }
        _ => EQUATION_PLACEHOLDER.to_string(),
    }
}

fn cell(display: &DisplayFormat, value: Option<f64>) -> Rounded {
    display.round(value, None)
}

/// Fit summary block
pub fn render_fit(
    stats: &SufficientStats,
    result: &RegressionResult,
    display: &DisplayFormat,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Least Squares Fit ===");
    if let Some(message) = result.error_message() {
        let _ = writeln!(out, "Warning: {}", message);
    }
    let _ = writeln!(out, "{}", equation(result, display));
    let _ = writeln!(out);
    let _ = writeln!(out, "  Slope (a):        {}", cell(display, result.slope));
    if result.std_err_slope.is_some() {
        let _ = writeln!(out, "    Std Error:      {}", cell(display, result.std_err_slope));
    }
    let _ = writeln!(out, "  Intercept (b):    {}", cell(display, result.intercept));
    if result.std_err_intercept.is_some() {
        let _ = writeln!(
            out,
            "    Std Error:      {}",
            cell(display, result.std_err_intercept)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  n:                {}", stats.n);
    let _ = writeln!(out, "  ΣX:               {}", display.round_value(stats.sum_x));
    let _ = writeln!(out, "  ΣY:               {}", display.round_value(stats.sum_y));
    let _ = writeln!(out, "  ΣX²:              {}", display.round_value(stats.sum_x2));
    let _ = writeln!(out, "  ΣXY:              {}", display.round_value(stats.sum_xy));
    let rss = if result.is_fitted() {
        cell(display, result.residual_sum_of_squares).to_string()
    } else {
        "-".to_string()
    };
    let _ = writeln!(out, "  Σ(Y-aX-b)²:       {}", rss);
    out
}

/// Derivation table with a `Sum` row
pub fn render_table(table: &DerivedTable, display: &DisplayFormat) -> String {
    if table.is_empty() {
        return "No data points.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "No.", "X", "Y", "X²", "XY", "(Y-aX-b)²"
    );
    let rule = "----- ------------ ------------ ------------ ------------ --------------";
    let _ = writeln!(out, "{}", rule);
    for row in &table.rows {
        let _ = writeln!(
            out,
            "{:>5} {:>12} {:>12} {:>12} {:>12} {:>14}",
            row.no,
            row.x,
            row.y,
            display.round_value(row.x2).to_string(),
            display.round_value(row.xy).to_string(),
            cell(display, row.residual_sq).to_string()
        );
    }
    let _ = writeln!(out, "{}", rule);
    let totals = &table.totals;
    let _ = writeln!(
        out,
        "{:>5} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Sum",
        display.round_value(totals.x).to_string(),
        display.round_value(totals.y).to_string(),
        display.round_value(totals.x2).to_string(),
        display.round_value(totals.xy).to_string(),
        cell(display, totals.residual_sq).to_string()
    );
    out
}

/// Step-by-step working of the closed-form solution
pub fn render_formula(breakdown: &FormulaBreakdown, result: &RegressionResult, display: &DisplayFormat) -> String {
    let f = |v: f64| display.round_value(v);
    let s = &breakdown.stats;
    let n = s.n;

    let mut out = String::new();
    let _ = writeln!(out, "=== Parameter Calculation ===");
    let _ = writeln!(
        out,
        "D = n·ΣX² - (ΣX)² = {} × {} - ({})² = {}",
        n,
        f(s.sum_x2),
        f(s.sum_x),
        f(breakdown.denominator)
    );
    let _ = writeln!(
        out,
        "a = (n·ΣXY - ΣX·ΣY) / D = ({}×{} - {}×{}) / {} = {}",
        n,
        f(s.sum_xy),
        f(s.sum_x),
        f(s.sum_y),
        f(breakdown.denominator),
        cell(display, result.slope)
    );
    let _ = writeln!(
        out,
        "b = (ΣX²·ΣY - ΣXY·ΣX) / D = ({}×{} - {}×{}) / {} = {}",
        f(s.sum_x2),
        f(s.sum_y),
        f(s.sum_xy),
        f(s.sum_x),
        f(breakdown.denominator),
        cell(display, result.intercept)
    );

    if n > 2.0 && result.std_err_slope.is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "=== Error Calculation ===");
        let _ = writeln!(
            out,
            "Ve = Σ(Y-aX-b)² / (n-2) = {} / {} = {}",
            f(breakdown.residual_sum_of_squares),
            n - 2.0,
            f(breakdown.residual_variance)
        );
        let _ = writeln!(out, "Sxx = D / n = {}", f(breakdown.sxx));
        let _ = writeln!(
            out,
            "σa = √(Ve / Sxx) = {}",
            cell(display, result.std_err_slope)
        );
        let _ = writeln!(
            out,
            "σb = √(Ve·ΣX² / (n·Sxx)) = {}",
            cell(display, result.std_err_intercept)
        );
    }
    out
}

/// Numbered point listing with ids for edit/delete
pub fn render_points(points: &[Point]) -> String {
    if points.is_empty() {
        return "No data points.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:>5} {:>6} {:>14} {:>14}", "No.", "ID", "X", "Y");
    for (i, p) in points.iter().enumerate() {
        let _ = writeln!(out, "{:>5} {:>6} {:>14} {:>14}", i + 1, p.id, p.x, p.y);
    }
    out
}

/// n / mean / SD / SE block for one dataset
pub fn render_summary(name: &str, summary: &SampleSummary, display: &DisplayFormat) -> String {
    let f = |v: Option<f64>| display.round(v, Some(SAMPLE_DIGITS));
    let mut out = String::new();
    let _ = writeln!(out, "{} (n = {}):", name, summary.n);
    let _ = writeln!(out, "  Sum:            {}", f(Some(summary.sum)));
    let _ = writeln!(out, "  Mean:           {}", f(summary.mean));
    let _ = writeln!(out, "  Std Dev (s):    {}", f(summary.sample_std_dev));
    let _ = writeln!(out, "  Std Error (SE): {}", f(summary.standard_error));
    out
}

/// Value listing for one dataset
pub fn render_dataset(dataset: &SampleDataset) -> String {
    if dataset.values.is_empty() {
        return format!("{}: no values.\n", dataset.name);
    }
    let mut out = String::new();
    let _ = writeln!(out, "{}:", dataset.name);
    for (i, value) in dataset.values.iter().enumerate() {
        let _ = writeln!(out, "{:>5} {:>6} {:>14}", i + 1, value.id.0, value.v);
    }
    out
}
