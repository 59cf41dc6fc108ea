// Closed-form least-squares fit over sufficient statistics
//
// Given n, ΣX, ΣY, ΣX², ΣXY the line y = a·x + b is
//
//   D = n·ΣX² − (ΣX)²
//   a = (n·ΣXY − ΣX·ΣY) / D
//   b = (ΣX²·ΣY − ΣXY·ΣX) / D
//
// Standard errors use the residual variance Ve = RSS / (n − 2) and the
// corrected sum of squares Sxx = D / n, so they exist only for n > 2.

use serde::Serialize;
use thiserror::Error;

use super::points::Point;

/// The only failure a fit can report
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitError {
    #[error("denominator is zero (X has no variance)")]
    ZeroDenominator,
}

/// The five sums that fully determine the least-squares line
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SufficientStats {
    pub n: f64,
    pub sum_x: f64,
    pub sum_y: f64,
    pub sum_x2: f64,
    pub sum_xy: f64,
}

impl SufficientStats {
    /// Single full pass over the point set
    ///
    /// Sums are rebuilt from scratch on every change; running totals would drift
    /// after edits and deletes.
    pub fn from_points(points: &[Point]) -> Self {
        let mut stats = Self {
            n: points.len() as f64,
            ..Self::default()
        };
        for p in points {
            stats.sum_x += p.x;
            stats.sum_y += p.y;
            stats.sum_x2 += p.x * p.x;
            stats.sum_xy += p.x * p.y;
        }
        stats
    }

    /// n·ΣX² − (ΣX)²
    pub fn denominator(&self) -> f64 {
        self.n * self.sum_x2 - self.sum_x * self.sum_x
    }
}

/// Where the residual sum of squares comes from
#[derive(Debug, Clone, Copy)]
pub enum Residuals<'a> {
    /// Recompute Σ(y − (a·x + b))² over these points once a and b are known
    Points(&'a [Point]),
    /// Use a value supplied by the user
    Given(f64),
}

/// Outcome of a fit
///
/// Numeric fields are `None` until there is enough input; `error` is set only
/// for a degenerate fit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RegressionResult {
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub std_err_slope: Option<f64>,
    pub std_err_intercept: Option<f64>,
    pub residual_sum_of_squares: Option<f64>,
    pub error: Option<FitError>,
}

impl RegressionResult {
    /// Nothing entered yet
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn degenerate() -> Self {
        Self {
            error: Some(FitError::ZeroDenominator),
            ..Self::default()
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.slope.is_some() && self.intercept.is_some()
    }

    /// User-facing warning text, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    /// Predicted y at `x`
    pub fn predict(&self, x: f64) -> Option<f64> {
        Some(self.slope? * x + self.intercept?)
    }
}

/// Fit a line to the given sufficient statistics
pub fn fit(stats: &SufficientStats, residuals: Residuals<'_>) -> RegressionResult {
    let n = stats.n;
    // n == 0 means nothing has been entered; that is not a failure.
    if n == 0.0 || !n.is_finite() {
        return RegressionResult::empty();
    }

    let denominator = stats.denominator();
    if denominator == 0.0 || !denominator.is_finite() {
        tracing::debug!(n, denominator, "degenerate fit");
        return RegressionResult::degenerate();
    }

    let slope = (n * stats.sum_xy - stats.sum_x * stats.sum_y) / denominator;
    let intercept = (stats.sum_x2 * stats.sum_y - stats.sum_xy * stats.sum_x) / denominator;

    let rss = match residuals {
        Residuals::Points(points) => residual_sum_of_squares(points, slope, intercept),
        Residuals::Given(rss) => rss,
    };

    let (std_err_slope, std_err_intercept) = standard_errors(stats, denominator, rss);

    RegressionResult {
        slope: Some(slope),
        intercept: Some(intercept),
        std_err_slope,
        std_err_intercept,
        residual_sum_of_squares: Some(rss),
        error: None,
    }
}

/// Σ(y − (a·x + b))², always recomputed in full
pub fn residual_sum_of_squares(points: &[Point], slope: f64, intercept: f64) -> f64 {
    points
        .iter()
        .map(|p| {
            let r = p.y - (slope * p.x + intercept);
            r * r
        })
        .sum()
}

fn standard_errors(stats: &SufficientStats, denominator: f64, rss: f64) -> (Option<f64>, Option<f64>) {
    let n = stats.n;
    // A two-point line has no residual degrees of freedom.
    if n <= 2.0 {
        return (None, None);
    }

    let ve = rss / (n - 2.0);
    let sxx = denominator / n;
    if sxx > 0.0 && ve >= 0.0 {
        let se_slope = (ve / sxx).sqrt();
        let se_intercept = (ve * stats.sum_x2 / (n * sxx)).sqrt();
        (Some(se_slope), Some(se_intercept))
    } else {
        (None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(pairs: &[(f64, f64)]) -> Vec<Point> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::new(i as u64 + 1, x, y))
            .collect()
    }

    #[test]
    fn test_sufficient_stats_full_pass() {
        let pts = points(&[(1.0, 2.0), (2.0, 3.0), (3.0, 5.0)]);
        let stats = SufficientStats::from_points(&pts);
        assert_eq!(stats.n, 3.0);
        assert_eq!(stats.sum_x, 6.0);
        assert_eq!(stats.sum_y, 10.0);
        assert_eq!(stats.sum_x2, 14.0);
        assert_eq!(stats.sum_xy, 23.0);
        assert_eq!(stats.denominator(), 6.0);
    }

    #[test]
    fn test_fit_zero_n_is_not_an_error() {
        let result = fit(&SufficientStats::default(), Residuals::Given(0.0));
        assert_eq!(result, RegressionResult::empty());
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_fit_nan_n_is_not_an_error() {
        let stats = SufficientStats {
            n: f64::NAN,
            ..SufficientStats::default()
        };
        assert_eq!(fit(&stats, Residuals::Given(0.0)), RegressionResult::empty());
    }

    #[test]
    fn test_fit_constant_x_is_degenerate() {
        let pts = points(&[(1.0, 1.0), (1.0, 5.0)]);
        let result = fit(&SufficientStats::from_points(&pts), Residuals::Points(&pts));
        assert!(result.slope.is_none());
        assert!(result.intercept.is_none());
        assert!(result.residual_sum_of_squares.is_none());
        assert_eq!(
            result.error_message().as_deref(),
            Some("denominator is zero (X has no variance)")
        );
    }

    #[test]
    fn test_fit_non_finite_denominator_is_degenerate() {
        let stats = SufficientStats {
            n: 3.0,
            sum_x: f64::INFINITY,
            sum_y: 1.0,
            sum_x2: 1.0,
            sum_xy: 1.0,
        };
        assert_eq!(fit(&stats, Residuals::Given(0.0)).error, Some(FitError::ZeroDenominator));
    }

    #[test]
    fn test_fit_known_line() {
        let pts = points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let result = fit(&SufficientStats::from_points(&pts), Residuals::Points(&pts));
        assert_eq!(result.slope, Some(2.0));
        assert_eq!(result.intercept, Some(0.0));
        assert_eq!(result.residual_sum_of_squares, Some(0.0));
        assert_eq!(result.std_err_slope, Some(0.0));
        assert_eq!(result.std_err_intercept, Some(0.0));
    }

    #[test]
    fn test_fit_standard_errors() {
        // y = 1.5x + 1/3 with residuals 1/6, -1/3, 1/6
        let pts = points(&[(1.0, 2.0), (2.0, 3.0), (3.0, 5.0)]);
        let result = fit(&SufficientStats::from_points(&pts), Residuals::Points(&pts));
        let rss = result.residual_sum_of_squares.unwrap();
        assert!((result.slope.unwrap() - 1.5).abs() < 1e-12);
        assert!((result.intercept.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((rss - 1.0 / 6.0).abs() < 1e-12);
        // Ve = 1/6, Sxx = 2
        let expected_slope = (1.0f64 / 12.0).sqrt();
        let expected_intercept = (1.0f64 / 6.0 * 14.0 / 6.0).sqrt();
        assert!((result.std_err_slope.unwrap() - expected_slope).abs() < 1e-12);
        assert!((result.std_err_intercept.unwrap() - expected_intercept).abs() < 1e-12);
    }

    #[test]
    fn test_fit_two_points_has_no_standard_errors() {
        let pts = points(&[(0.0, 1.0), (4.0, 9.0)]);
        let result = fit(&SufficientStats::from_points(&pts), Residuals::Points(&pts));
        assert_eq!(result.slope, Some(2.0));
        assert_eq!(result.intercept, Some(1.0));
        assert!(result.std_err_slope.is_none());
        assert!(result.std_err_intercept.is_none());
    }

    #[test]
    fn test_fit_given_negative_rss_skips_standard_errors() {
        let stats = SufficientStats {
            n: 3.0,
            sum_x: 6.0,
            sum_y: 12.0,
            sum_x2: 14.0,
            sum_xy: 28.0,
        };
        let result = fit(&stats, Residuals::Given(-1.0));
        assert!(result.is_fitted());
        assert_eq!(result.residual_sum_of_squares, Some(-1.0));
        assert!(result.std_err_slope.is_none());
        assert!(result.std_err_intercept.is_none());
    }

    #[test]
    fn test_predict() {
        let pts = points(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let result = fit(&SufficientStats::from_points(&pts), Residuals::Points(&pts));
        assert_eq!(result.predict(10.0), Some(20.0));
        assert_eq!(RegressionResult::empty().predict(1.0), None);
    }
}
