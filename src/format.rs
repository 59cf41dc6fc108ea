//! Display-precision policy for every rendered number
//!
//! Two rounding policies are supported:
//! - significant figures (`sig`): digits counted from the first nonzero digit
//! - decimal places (`dec`): digits after the decimal point
//!
//! Rounding is done by shifting the shortest round-trip decimal representation
//! of the value (`"{v}e{k}"`), rounding half away from zero, and shifting back.
//! Working on the decimal text keeps results like `1.005 -> 1.01` stable where
//! a binary multiply by `10^k` would drift.
//!
//! The current [`DisplayFormat`] lives in a process-wide `RwLock`. Every render
//! reads it synchronously through [`current`], so a change made with
//! [`set_format`] is visible to the very next call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

/// Placeholder rendered for a value that cannot be shown
pub const MISSING: &str = "---";

/// Default number of digits when no preference exists
pub const DEFAULT_DIGITS: u32 = 4;

/// Rounding policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum FormatMode {
    /// Significant figures
    #[default]
    #[serde(rename = "sig")]
    #[value(name = "sig")]
    SignificantFigures,
    /// Decimal places
    #[serde(rename = "dec")]
    #[value(name = "dec")]
    DecimalPlaces,
}

impl FormatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatMode::SignificantFigures => "sig",
            FormatMode::DecimalPlaces => "dec",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sig" | "significant-figures" => Ok(FormatMode::SignificantFigures),
            "dec" | "decimal-places" => Ok(FormatMode::DecimalPlaces),
            other => Err(format!(
                "Unknown format mode: {}. Expected 'sig' or 'dec'",
                other
            )),
        }
    }
}

/// Result of rounding a value for display
///
/// Stays numeric so callers can keep comparing or summing; `Display` renders
/// the missing case as `---`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rounded {
    Value(f64),
    Missing,
}

impl Rounded {
    pub fn value(&self) -> Option<f64> {
        match self {
            Rounded::Value(v) => Some(*v),
            Rounded::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Rounded::Missing)
    }
}

impl fmt::Display for Rounded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rounded::Value(v) => write!(f, "{}", v),
            Rounded::Missing => f.write_str(MISSING),
        }
    }
}

/// Display format: rounding policy plus digit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormat {
    pub mode: FormatMode,
    pub digits: u32,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            mode: FormatMode::SignificantFigures,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl DisplayFormat {
    /// Create a format, falling back to the default digit count for `digits == 0`
    pub fn new(mode: FormatMode, digits: u32) -> Self {
        Self {
            mode,
            digits: if digits == 0 { DEFAULT_DIGITS } else { digits },
        }
    }

    /// Apply a user-supplied setting, keeping the current value for any part
    /// that does not validate
    ///
    /// `mode` must name a known policy; `digits` must be finite and positive
    /// and is floored.
    pub fn apply(&mut self, mode: &str, digits: f64) {
        if let Ok(mode) = mode.parse::<FormatMode>() {
            self.mode = mode;
        }
        if digits.is_finite() && digits >= 1.0 {
            self.digits = digits.floor().min(u32::MAX as f64) as u32;
        }
    }

    /// Round `value` under this format
    ///
    /// `digits_override` replaces the configured digit count for this call only.
    pub fn round(&self, value: Option<f64>, digits_override: Option<u32>) -> Rounded {
        let v = match value {
            Some(v) if v.is_finite() => v,
            _ => return Rounded::Missing,
        };
        if v == 0.0 {
            return Rounded::Value(0.0);
        }

        let digits = digits_override.unwrap_or(self.digits);
        let rounded = match self.mode {
            FormatMode::SignificantFigures => round_significant(v, digits.max(1)),
            FormatMode::DecimalPlaces => round_decimal(v, digits),
        };
        Rounded::Value(rounded)
    }

    /// Round a value that is always present
    pub fn round_value(&self, value: f64) -> Rounded {
        self.round(Some(value), None)
    }
}

/// Round to `places` digits after the decimal point, half away from zero
pub fn round_decimal(value: f64, places: u32) -> f64 {
    let places = places.min(i32::MAX as u32) as i32;
    round_at(value, places)
}

/// Round to `digits` significant figures, half away from zero
pub fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = digits.max(1).min(i32::MAX as u32) as i32;
    let exponent = decimal_exponent(value);
    round_at(value, digits - 1 - exponent)
}

/// Decimal exponent of the shortest round-trip representation of `value`
///
/// Read from the `{:e}` rendering so powers of ten never land one off the way
/// `log10().floor()` can.
fn decimal_exponent(value: f64) -> i32 {
    let text = format!("{:e}", value.abs());
    text.rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i32>().ok())
        .unwrap_or_else(|| value.abs().log10().floor() as i32)
}

/// Keep `places` digits to the right of the decimal point (negative `places`
/// rounds to tens, hundreds, ...)
fn round_at(value: f64, places: i32) -> f64 {
    let shifted = shift(value, places);
    if !shifted.is_finite() {
        // Too large to carry any fractional digits at this precision.
        return value;
    }
    let back = shift(shifted.round(), -places);
    if !back.is_finite() {
        value
    } else if back == 0.0 {
        // -0.0 from a small negative input
        0.0
    } else {
        back
    }
}

fn shift(value: f64, places: i32) -> f64 {
    format!("{}e{}", value, places)
        .parse::<f64>()
        .unwrap_or(f64::NAN)
}

static CURRENT: RwLock<DisplayFormat> = RwLock::new(DisplayFormat {
    mode: FormatMode::SignificantFigures,
    digits: DEFAULT_DIGITS,
});

/// Snapshot of the process-wide display format
pub fn current() -> DisplayFormat {
    match CURRENT.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Replace the process-wide display format
pub fn install(format: DisplayFormat) {
    let format = DisplayFormat::new(format.mode, format.digits);
    match CURRENT.write() {
        Ok(mut guard) => *guard = format,
        Err(poisoned) => *poisoned.into_inner() = format,
    }
    tracing::debug!(mode = %format.mode, digits = format.digits, "display format installed");
}

/// Update the process-wide display format from user input
///
/// Invalid parts are ignored and keep their previous value.
pub fn set_format(mode: &str, digits: f64) -> DisplayFormat {
    let mut next = current();
    next.apply(mode, digits);
    install(next);
    next
}

/// Round `value` under the process-wide format
pub fn format(value: Option<f64>) -> Rounded {
    current().round(value, None)
}

/// Round `value` under the process-wide mode with an explicit digit count
pub fn format_with(value: Option<f64>, digits: u32) -> Rounded {
    current().round(value, Some(digits))
}
