//! Delimited export of the derivation table and raw points
//!
//! CSV uses commas (file download), TSV uses tabs (clipboard paste into a
//! spreadsheet). Numbers are written unrounded in shortest round-trip form.

use crate::regression::{DerivedTable, Point, TableRow};

/// Field separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Default file name for a table download
pub const TABLE_FILE_NAME: &str = "least_squares_detailed_data.csv";

/// Default file name for a raw point download
pub const POINTS_FILE_NAME: &str = "least_squares_data.csv";

const TABLE_HEADERS: [&str; 6] = ["No", "X", "Y", "X^2", "XY", "(Y-aX-b)^2"];

/// Label of the trailing aggregate row
pub const SUM_LABEL: &str = "Sum";

/// Serializer for a [`DerivedTable`]
#[derive(Debug)]
pub struct TableExport<'a> {
    table: &'a DerivedTable,
    delimiter: Delimiter,
}

impl<'a> TableExport<'a> {
    pub fn new(table: &'a DerivedTable, delimiter: Delimiter) -> Self {
        Self { table, delimiter }
    }

    fn join(&self, fields: &[String]) -> String {
        let sep = self.delimiter.as_char().to_string();
        fields.join(sep.as_str())
    }

    fn header(&self) -> String {
        let fields: Vec<String> = TABLE_HEADERS.iter().map(|h| h.to_string()).collect();
        self.join(&fields)
    }

    /// Missing residuals become an empty cell
    fn optional(value: Option<f64>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    fn format_row(&self, row: &TableRow) -> String {
        self.join(&[
            row.no.to_string(),
            row.x.to_string(),
            row.y.to_string(),
            row.x2.to_string(),
            row.xy.to_string(),
            Self::optional(row.residual_sq),
        ])
    }

    fn footer(&self) -> String {
        let totals = &self.table.totals;
        self.join(&[
            SUM_LABEL.to_string(),
            totals.x.to_string(),
            totals.y.to_string(),
            totals.x2.to_string(),
            totals.xy.to_string(),
            Self::optional(totals.residual_sq),
        ])
    }

    /// Header, one line per point, and the `Sum` row
    ///
    /// Lines are newline-separated with no trailing newline.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.table.rows.len() + 2);
        lines.push(self.header());
        lines.extend(self.table.rows.iter().map(|row| self.format_row(row)));
        lines.push(self.footer());
        lines.join("\n")
    }
}

/// Serialize a derivation table
pub fn table_to_delimited(table: &DerivedTable, delimiter: Delimiter) -> String {
    TableExport::new(table, delimiter).to_text()
}

/// Serialize the raw point list as `X,Y` (or tab-separated) with a header row
pub fn points_to_delimited(points: &[Point], delimiter: Delimiter) -> String {
    let sep = delimiter.as_char();
    let mut output = format!("X{}Y", sep);
    for p in points {
        output.push('\n');
        output.push_str(&format!("{}{}{}", p.x, sep, p.y));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::derive_table;

    fn sample_points() -> Vec<Point> {
        vec![Point::new(1, 1.0, 2.0), Point::new(2, 2.0, 3.0), Point::new(3, 3.0, 5.0)]
    }

    #[test]
    fn test_table_csv() {
        let table = derive_table(&sample_points(), Some(1.5), Some(0.5));
        let csv = table_to_delimited(&table, Delimiter::Comma);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "No,X,Y,X^2,XY,(Y-aX-b)^2");
        assert_eq!(lines[1], "1,1,2,1,2,0");
        assert_eq!(lines[2], "2,2,3,4,6,0.25");
        assert_eq!(lines[3], "3,3,5,9,15,0");
        assert_eq!(lines[4], "Sum,6,10,14,23,0.25");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_table_tsv_without_line() {
        let table = derive_table(&sample_points(), None, None);
        let tsv = table_to_delimited(&table, Delimiter::Tab);
        assert!(tsv.starts_with("No\tX\tY\tX^2\tXY\t(Y-aX-b)^2\n"));
        assert!(tsv.contains("\n1\t1\t2\t1\t2\t\n"));
        assert!(tsv.ends_with("Sum\t6\t10\t14\t23\t"));
    }

    #[test]
    fn test_empty_table_has_header_and_sum() {
        let table = derive_table(&[], None, None);
        assert_eq!(
            table_to_delimited(&table, Delimiter::Comma),
            "No,X,Y,X^2,XY,(Y-aX-b)^2\nSum,0,0,0,0,"
        );
    }

    #[test]
    fn test_points_export() {
        let points = vec![Point::new(1, 1.5, -2.0), Point::new(2, 3.0, 4.25)];
        assert_eq!(points_to_delimited(&points, Delimiter::Comma), "X,Y\n1.5,-2\n3,4.25");
        assert_eq!(points_to_delimited(&points, Delimiter::Tab), "X\tY\n1.5\t-2\n3\t4.25");
        assert_eq!(points_to_delimited(&[], Delimiter::Comma), "X,Y");
    }
}
