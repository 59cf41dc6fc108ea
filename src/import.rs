//! Bulk import of pasted or file data
//!
//! Lines are split on any run of commas, tabs or spaces. A point line needs two
//! leading finite numbers; anything else (headers, blank lines, notes) is
//! skipped without complaint.

/// Outcome of parsing a block of point lines
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointImport {
    pub points: Vec<(f64, f64)>,
    /// 1-based line numbers that did not yield a point
    pub skipped: Vec<usize>,
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse one `x y` line
pub fn parse_point_line(line: &str) -> Option<(f64, f64)> {
    let mut parts = tokens(line);
    let x = parse_number(parts.next()?)?;
    let y = parse_number(parts.next()?)?;
    Some((x, y))
}

/// Parse every line of `text` into (x, y) pairs
pub fn parse_points(text: &str) -> PointImport {
    let mut import = PointImport::default();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_point_line(line) {
            Some(point) => import.points.push(point),
            None => import.skipped.push(index + 1),
        }
    }
    if !import.skipped.is_empty() {
        tracing::debug!(skipped = ?import.skipped, "lines without two numbers were skipped");
    }
    import
}

/// Parse a flat list of values separated by commas, tabs, spaces or newlines
///
/// Tokens that are not finite numbers are dropped.
pub fn parse_values(text: &str) -> Vec<f64> {
    text.lines()
        .flat_map(tokens)
        .filter_map(parse_number)
        .collect()
}
