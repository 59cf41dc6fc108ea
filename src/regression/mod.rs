// Least-squares line fitting
//
// The engine works from five sufficient statistics (n, ΣX, ΣY, ΣX², ΣXY) that
// either come from a point set or are typed in directly. Sums are rebuilt by a
// full pass on every change, and the residual sum of squares is recomputed
// fresh against the fitted line, so edits and deletes never leave stale totals.
//
// Layout:
// - engine:  closed-form fit and standard errors
// - points:  point set with stable ids
// - manual:  free-text sufficient statistics
// - history: snapshot undo/redo
// - table:   per-point derivation table and formula breakdown
// - session: mode flag + recompute-on-mutation

mod engine;
mod history;
mod manual;
mod points;
mod session;
mod table;

pub use engine::{
    fit, residual_sum_of_squares, FitError, RegressionResult, Residuals, SufficientStats,
};
pub use history::HistoryLog;
pub use manual::{parse_field, ManualField, ManualStatistics};
pub use points::{Point, PointId, PointSet};
pub use session::{InputMode, RegressionSession};
pub use table::{derive_table, derive_table_for, DerivedTable, FormulaBreakdown, TableRow, TableTotals};
