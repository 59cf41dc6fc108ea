//! Interactive command interpreter
//!
//! Reads one command per line and keeps a regression session plus a set of
//! standard-error datasets alive between commands. A malformed command prints
//! an error and the session carries on.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config;
use crate::csv_output::{points_to_delimited, table_to_delimited, Delimiter};
use crate::format::{self, DisplayFormat};
use crate::import::{parse_points, parse_values};
use crate::regression::{InputMode, ManualField, PointId, RegressionSession};
use crate::sample_stats::{Datasets, ValueId};
use crate::text_output::{
    render_dataset, render_fit, render_formula, render_points, render_summary, render_table,
};

pub const PROMPT: &str = "lsq> ";
pub const PASTE_PROMPT: &str = "...> ";

/// Line that ends a `paste` block
const PASTE_END: &str = ".";

pub const HELP: &str = "\
Points:
  add X Y            append a point
  edit ID X Y        change a point
  del ID             delete a point
  list               show points with their ids
  import FILE        append points from a file
  paste              append pasted lines, finish with a lone '.'
  reset              clear points (or manual fields in manual mode)
  undo | redo        step through point history
Manual statistics:
  mode points|manual select the input source
  set FIELD [VALUE]  FIELD is n, sumx, sumy, sumx2, sumxy or rss; no VALUE clears it
Results:
  fit                fitted line with standard errors
  formula            calculation steps
  table              per-point table with sums
  export KIND [FILE] KIND is csv, tsv, points-csv or points-tsv
  format [sig|dec N] show or change number display
Standard error:
  ds new | ds use I | ds list | ds show
  ds add V | ds edit ID V | ds del ID | ds clear | ds reset
Other:
  help | quit";

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

#[derive(Debug)]
pub struct Repl {
    regression: RegressionSession,
    datasets: Datasets,
    config_path: Option<PathBuf>,
    paste: Option<String>,
}

fn parse_number(token: &str, what: &str) -> Result<f64> {
    let value: f64 = token
        .parse()
        .with_context(|| format!("{} is not a number: {}", what, token))?;
    if !value.is_finite() {
        bail!("{} must be finite: {}", what, token);
    }
    Ok(value)
}

fn parse_id(token: &str) -> Result<u64> {
    token
        .parse()
        .with_context(|| format!("Invalid id: {}", token))
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> Result<()> {
    if args.len() != count {
        bail!("Usage: {}", usage);
    }
    Ok(())
}

impl Repl {
    /// `config_path` receives display-format changes made with `format`
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            regression: RegressionSession::new(),
            datasets: Datasets::new(),
            config_path,
            paste: None,
        }
    }

    pub fn regression(&self) -> &RegressionSession {
        &self.regression
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn prompt(&self) -> &'static str {
        if self.paste.is_some() {
            PASTE_PROMPT
        } else {
            PROMPT
        }
    }

    fn display(&self) -> DisplayFormat {
        format::current()
    }

    /// Run one input line
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        if let Some(buffer) = self.paste.as_mut() {
            if line.trim() != PASTE_END {
                buffer.push_str(line);
                buffer.push('\n');
                return Ok(Outcome::Continue(String::new()));
            }
            let text = self.paste.take().unwrap_or_default();
            return Ok(Outcome::Continue(self.import_text(&text)));
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(Outcome::Continue(String::new()));
        };

        let output = match command {
            "quit" | "exit" => return Ok(Outcome::Quit),
            "help" => HELP.to_string(),
            "add" => self.add(args)?,
            "edit" => self.edit(args)?,
            "del" | "delete" => self.delete(args)?,
            "list" => render_points(self.regression.points()),
            "import" => self.import_file(args)?,
            "paste" => {
                self.require_points_mode()?;
                self.paste = Some(String::new());
                format!("Paste X Y lines; finish with a lone '{}'.", PASTE_END)
            }
            "reset" => {
                self.regression.reset();
                "Cleared.".to_string()
            }
            "undo" => self.step(RegressionSession::undo, "Nothing to undo.")?,
            "redo" => self.step(RegressionSession::redo, "Nothing to redo.")?,
            "mode" => self.mode(args)?,
            "set" => self.set(args)?,
            "fit" => self.fit_text(),
            "formula" => self.formula_text(),
            "table" => self.table_text()?,
            "export" => self.export(args)?,
            "format" => self.format(args)?,
            "ds" => self.dataset(args)?,
            other => bail!("Unknown command: {}. Type 'help' for a list.", other),
        };
        Ok(Outcome::Continue(output))
    }

    /// Drive the interpreter until `quit` or end of input
    ///
    /// Errors are written to `output` and do not stop the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W, interactive: bool) -> Result<()> {
        if interactive {
            write!(output, "{}", self.prompt())?;
            output.flush()?;
        }
        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            match self.execute(&line) {
                Ok(Outcome::Quit) => return Ok(()),
                Ok(Outcome::Continue(text)) => {
                    if !text.is_empty() {
                        writeln!(output, "{}", text.trim_end())?;
                    }
                }
                Err(e) => writeln!(output, "error: {:#}", e)?,
            }
            if interactive {
                write!(output, "{}", self.prompt())?;
                output.flush()?;
            }
        }
        if let Some(text) = self.paste.take() {
            let summary = self.import_text(&text);
            writeln!(output, "{}", summary)?;
        }
        Ok(())
    }

    fn require_points_mode(&self) -> Result<()> {
        if self.regression.mode() != InputMode::Points {
            bail!("Point editing needs 'mode points'");
        }
        Ok(())
    }

    fn add(&mut self, args: &[&str]) -> Result<String> {
        self.require_points_mode()?;
        expect_args(args, 2, "add X Y")?;
        let x = parse_number(args[0], "X")?;
        let y = parse_number(args[1], "Y")?;
        match self.regression.add_point(x, y) {
            Some(id) => Ok(format!("Added point {} ({}, {}).", id, x, y)),
            None => bail!("Point was not added"),
        }
    }

    fn edit(&mut self, args: &[&str]) -> Result<String> {
        self.require_points_mode()?;
        expect_args(args, 3, "edit ID X Y")?;
        let id = PointId(parse_id(args[0])?);
        let x = parse_number(args[1], "X")?;
        let y = parse_number(args[2], "Y")?;
        Ok(if self.regression.update_point(id, x, y) {
            format!("Updated point {}.", id)
        } else {
            format!("No point with id {}.", id)
        })
    }

    fn delete(&mut self, args: &[&str]) -> Result<String> {
        self.require_points_mode()?;
        expect_args(args, 1, "del ID")?;
        let id = PointId(parse_id(args[0])?);
        Ok(if self.regression.delete_point(id) {
            format!("Deleted point {}.", id)
        } else {
            format!("No point with id {}.", id)
        })
    }

    fn import_text(&mut self, text: &str) -> String {
        let parsed = parse_points(text);
        let added = self.regression.import(parsed.points);
        if parsed.skipped.is_empty() {
            format!("Imported {} points.", added)
        } else {
            format!(
                "Imported {} points ({} lines skipped).",
                added,
                parsed.skipped.len()
            )
        }
    }

    fn import_file(&mut self, args: &[&str]) -> Result<String> {
        self.require_points_mode()?;
        expect_args(args, 1, "import FILE")?;
        let text = std::fs::read_to_string(args[0])
            .with_context(|| format!("Failed to read {}", args[0]))?;
        Ok(self.import_text(&text))
    }

    fn step(&mut self, action: fn(&mut RegressionSession) -> bool, nothing: &str) -> Result<String> {
        self.require_points_mode()?;
        Ok(if action(&mut self.regression) {
            format!("{} points.", self.regression.points().len())
        } else {
            nothing.to_string()
        })
    }

    fn mode(&mut self, args: &[&str]) -> Result<String> {
        expect_args(args, 1, "mode points|manual")?;
        let (mode, name) = match args[0] {
            "points" | "raw" => (InputMode::Points, "points"),
            "manual" | "stats" => (InputMode::Manual, "manual"),
            other => bail!("Unknown mode: {}. Expected 'points' or 'manual'", other),
        };
        self.regression.set_mode(mode);
        Ok(format!("Mode: {}.", name))
    }

    fn set(&mut self, args: &[&str]) -> Result<String> {
        let Some((field, rest)) = args.split_first() else {
            bail!("Usage: set FIELD [VALUE]");
        };
        let field: ManualField = field.parse().map_err(anyhow::Error::msg)?;
        let text = rest.join(" ");
        self.regression.set_manual_field(field, text.clone());
        let mut message = if text.is_empty() {
            format!("Cleared {:?}.", field)
        } else {
            format!("Set {:?} = {}.", field, text)
        };
        if self.regression.mode() != InputMode::Manual {
            message.push_str(" (takes effect in 'mode manual')");
        }
        Ok(message)
    }

    fn fit_text(&self) -> String {
        render_fit(
            &self.regression.stats(),
            self.regression.result(),
            &self.display(),
        )
    }

    fn formula_text(&self) -> String {
        let result = self.regression.result();
        match self.regression.formula() {
            Some(breakdown) if result.is_fitted() => {
                render_formula(&breakdown, result, &self.display())
            }
            _ => "No fitted line yet.".to_string(),
        }
    }

    fn table_text(&self) -> Result<String> {
        self.require_points_mode()?;
        Ok(render_table(&self.regression.table(), &self.display()))
    }

    fn export(&self, args: &[&str]) -> Result<String> {
        let Some((&kind, rest)) = args.split_first() else {
            bail!("Usage: export csv|tsv|points-csv|points-tsv [FILE]");
        };
        if matches!(kind, "csv" | "tsv") {
            self.require_points_mode()?;
        }
        let text = match kind {
            "csv" => table_to_delimited(&self.regression.table(), Delimiter::Comma),
            "tsv" => table_to_delimited(&self.regression.table(), Delimiter::Tab),
            "points-csv" => points_to_delimited(self.regression.points(), Delimiter::Comma),
            "points-tsv" => points_to_delimited(self.regression.points(), Delimiter::Tab),
            other => bail!("Unknown export kind: {}", other),
        };
        match rest {
            [] => Ok(text),
            [path] => {
                std::fs::write(path, format!("{}\n", text))
                    .with_context(|| format!("Failed to write {}", path))?;
                Ok(format!("Wrote {}.", path))
            }
            _ => bail!("Usage: export KIND [FILE]"),
        }
    }

    fn format(&mut self, args: &[&str]) -> Result<String> {
        let display = match args {
            [] => self.display(),
            [mode, digits] => {
                let digits = digits.parse::<f64>().unwrap_or(f64::NAN);
                let display = format::set_format(mode, digits);
                if let Some(path) = &self.config_path {
                    if let Err(e) = config::save(path, &display) {
                        tracing::warn!("Failed to save display format: {}", e);
                    }
                }
                display
            }
            _ => bail!("Usage: format [sig|dec DIGITS]"),
        };
        Ok(format!("Display: {} {}.", display.mode, display.digits))
    }

    fn dataset(&mut self, args: &[&str]) -> Result<String> {
        let Some((&sub, rest)) = args.split_first() else {
            bail!("Usage: ds new|use|add|edit|del|clear|reset|list|show");
        };
        let display = self.display();
        let output = match (sub, rest) {
            ("new", []) => {
                let index = self.datasets.add_dataset();
                format!("Created {} (#{}).", self.datasets.active().name, index + 1)
            }
            ("use", [index]) => {
                let index: usize = index
                    .parse()
                    .with_context(|| format!("Invalid dataset number: {}", index))?;
                if index == 0 || !self.datasets.select(index - 1) {
                    bail!("No dataset #{}", index);
                }
                format!("Using {}.", self.datasets.active().name)
            }
            ("add", values) if !values.is_empty() => {
                let parsed = parse_values(&values.join(" "));
                if parsed.is_empty() {
                    bail!("No numeric values given");
                }
                for v in &parsed {
                    self.datasets.add_value(*v);
                }
                render_summary(
                    &self.datasets.active().name,
                    &self.datasets.active_summary(),
                    &display,
                )
            }
            ("edit", [id, value]) => {
                let id = ValueId(parse_id(id)?);
                let v = parse_number(value, "Value")?;
                if self.datasets.edit_value(id, v) {
                    format!("Updated value {}.", id.0)
                } else {
                    format!("No value with id {}.", id.0)
                }
            }
            ("del", [id]) => {
                let id = ValueId(parse_id(id)?);
                if self.datasets.delete_value(id) {
                    format!("Deleted value {}.", id.0)
                } else {
                    format!("No value with id {}.", id.0)
                }
            }
            ("clear", []) => {
                self.datasets.clear_active();
                format!("Cleared {}.", self.datasets.active().name)
            }
            ("reset", []) => {
                self.datasets.reset_all();
                "Datasets reset.".to_string()
            }
            ("list", []) => render_dataset(self.datasets.active()),
            ("show", []) => self
                .datasets
                .iter()
                .map(|d| render_summary(&d.name, &d.summary(), &display))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => bail!("Usage: ds new|use I|add V...|edit ID V|del ID|clear|reset|list|show"),
        };
        Ok(output)
    }
}
