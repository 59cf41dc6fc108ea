//! One regression calculation session
//!
//! Holds the active input mode, the point set with its history, and the manual
//! statistics. Every mutation recomputes the fit synchronously, so `result()`
//! is always current.

use serde::{Deserialize, Serialize};

use super::engine::{fit, RegressionResult, Residuals, SufficientStats};
use super::history::HistoryLog;
use super::manual::{ManualField, ManualStatistics};
use super::points::{Point, PointId, PointSet};
use super::table::{derive_table, derive_table_for, DerivedTable, FormulaBreakdown};

/// Which source feeds the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Raw (x, y) points
    #[default]
    Points,
    /// Directly-entered sufficient statistics
    Manual,
}

#[derive(Debug, Clone)]
pub struct RegressionSession {
    mode: InputMode,
    points: PointSet,
    history: HistoryLog<Vec<Point>>,
    manual: ManualStatistics,
    stats: SufficientStats,
    result: RegressionResult,
}

impl Default for RegressionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegressionSession {
    pub fn new() -> Self {
        Self {
            mode: InputMode::Points,
            points: PointSet::new(),
            history: HistoryLog::new(Vec::new()),
            manual: ManualStatistics::new(),
            stats: SufficientStats::default(),
            result: RegressionResult::empty(),
        }
    }

    /// Session preloaded with points as one history step
    pub fn with_points<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut session = Self::new();
        session.import(pairs);
        session
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.recompute();
    }

    pub fn points(&self) -> &[Point] {
        self.points.as_slice()
    }

    pub fn manual(&self) -> &ManualStatistics {
        &self.manual
    }

    pub fn result(&self) -> &RegressionResult {
        &self.result
    }

    pub fn history(&self) -> &HistoryLog<Vec<Point>> {
        &self.history
    }

    /// Sufficient statistics behind the current result
    ///
    /// In manual mode unset fields read as zero here; the fit itself still
    /// treats them as missing.
    pub fn stats(&self) -> SufficientStats {
        match self.mode {
            InputMode::Points => self.stats,
            InputMode::Manual => self.manual.display_statistics(),
        }
    }

    /// Residual sum of squares feeding the standard errors
    pub fn residual_sum_of_squares(&self) -> f64 {
        match self.mode {
            InputMode::Points => self.result.residual_sum_of_squares.unwrap_or(0.0),
            InputMode::Manual => self.manual.residual_sum_of_squares(),
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64) -> Option<PointId> {
        let id = self.points.add(x, y)?;
        self.commit();
        Some(id)
    }

    pub fn update_point(&mut self, id: PointId, x: f64, y: f64) -> bool {
        let changed = self.points.update(id, x, y);
        if changed {
            self.commit();
        }
        changed
    }

    pub fn delete_point(&mut self, id: PointId) -> bool {
        let changed = self.points.delete(id);
        if changed {
            self.commit();
        }
        changed
    }

    /// Append imported points as a single undo step
    pub fn import<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let added = self.points.extend(pairs);
        if added > 0 {
            self.commit();
        }
        tracing::debug!(added, total = self.points.len(), "points imported");
        added
    }

    pub fn replace_points<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let added = self.points.replace_all(pairs);
        self.commit();
        added
    }

    /// Clear the active input
    ///
    /// In point mode the empty set becomes a new history step; in manual mode
    /// every field is blanked.
    pub fn reset(&mut self) {
        match self.mode {
            InputMode::Points => {
                self.points.clear();
                self.commit();
            }
            InputMode::Manual => {
                self.manual = ManualStatistics::new();
                self.recompute();
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.points.restore(snapshot);
                self.recompute();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.points.restore(snapshot);
                self.recompute();
                true
            }
            None => false,
        }
    }

    pub fn set_manual_field(&mut self, field: ManualField, text: impl Into<String>) {
        self.manual.set(field, text);
        self.recompute();
    }

    /// Per-point table against the line fitted to those points
    ///
    /// In manual mode the line does not come from the point set, so the
    /// residual column is left empty.
    pub fn table(&self) -> DerivedTable {
        match self.mode {
            InputMode::Points => derive_table_for(self.points.as_slice(), &self.result),
            InputMode::Manual => derive_table(self.points.as_slice(), None, None),
        }
    }

    pub fn formula(&self) -> Option<FormulaBreakdown> {
        FormulaBreakdown::from_stats(&self.stats(), self.residual_sum_of_squares())
    }

    fn commit(&mut self) {
        self.history.push(self.points.snapshot());
        self.recompute();
    }

    fn recompute(&mut self) {
        self.stats = SufficientStats::from_points(self.points.as_slice());
        self.result = match self.mode {
            InputMode::Points => fit(&self.stats, Residuals::Points(self.points.as_slice())),
            InputMode::Manual => self.manual.fit(),
        };
        tracing::debug!(
            mode = ?self.mode,
            n = self.stats.n,
            slope = ?self.result.slope,
            intercept = ?self.result.intercept,
            "regression recomputed"
        );
    }
}
