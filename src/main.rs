use anyhow::{bail, Context, Result};
use clap::Parser;
use lsqcalc::{
    cli::{Cli, Command, ConfigAction, OutputFormat, StatsArgs},
    config,
    csv_output::{table_to_delimited, Delimiter},
    format::{self, DisplayFormat},
    import::{parse_points, parse_values},
    json_output::{JsonFitReport, JsonSampleReport},
    regression::{InputMode, ManualField, RegressionSession},
    repl::Repl,
    sample_stats::Datasets,
    text_output::{render_fit, render_formula, render_summary, render_table},
};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Saved preference, or the default when there is none or it cannot be read
fn load_display(path: Option<&Path>) -> DisplayFormat {
    let Some(path) = path else {
        return DisplayFormat::default();
    };
    match config::load(path) {
        Ok(display) => display,
        Err(e) => {
            tracing::warn!("{}; using default display format", e);
            eprintln!("Warning: {}", e);
            DisplayFormat::default()
        }
    }
}

/// Apply one-run --mode/--digits overrides
fn with_overrides(mut display: DisplayFormat, args: &Cli) -> DisplayFormat {
    if let Some(mode) = args.mode {
        display.mode = mode;
    }
    if let Some(digits) = args.digits {
        display.digits = digits;
    }
    display
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_fit(file: Option<PathBuf>, output: OutputFormat) -> Result<()> {
    let text = read_input(file.as_deref())?;
    let parsed = parse_points(&text);
    if !parsed.skipped.is_empty() {
        eprintln!("Skipped {} lines without two numbers", parsed.skipped.len());
    }
    let session = RegressionSession::with_points(parsed.points);
    let display = format::current();

    match output {
        OutputFormat::Text => {
            println!("{}", render_fit(&session.stats(), session.result(), &display));
            print!("{}", render_table(&session.table(), &display));
        }
        OutputFormat::Json => {
            println!("{}", JsonFitReport::from_session(&session, &display).to_json()?);
        }
        OutputFormat::Csv => println!("{}", table_to_delimited(&session.table(), Delimiter::Comma)),
        OutputFormat::Tsv => println!("{}", table_to_delimited(&session.table(), Delimiter::Tab)),
    }
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<()> {
    let mut session = RegressionSession::new();
    session.set_mode(InputMode::Manual);
    let fields = [
        (ManualField::N, args.n),
        (ManualField::SumX, args.sum_x),
        (ManualField::SumY, args.sum_y),
        (ManualField::SumX2, args.sum_x2),
        (ManualField::SumXY, args.sum_xy),
        (ManualField::SumResiduals, args.sum_residuals),
    ];
    for (field, text) in fields {
        session.set_manual_field(field, text.unwrap_or_default());
    }
    let display = format::current();

    match args.output {
        OutputFormat::Text => {
            println!("{}", render_fit(&session.stats(), session.result(), &display));
            if let (Some(breakdown), true) = (session.formula(), session.result().is_fitted()) {
                print!("{}", render_formula(&breakdown, session.result(), &display));
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFitReport::from_session(&session, &display).to_json()?);
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            bail!("The derivation table needs point data; use --output text or json")
        }
    }
    Ok(())
}

fn run_se(files: Vec<PathBuf>, output: OutputFormat) -> Result<()> {
    let mut datasets = Datasets::new();
    let mut names = Vec::new();

    if files.is_empty() {
        for v in parse_values(&read_input(None)?) {
            datasets.add_value(v);
        }
        names.push(datasets.active().name.clone());
    } else {
        for (i, path) in files.iter().enumerate() {
            if i > 0 {
                datasets.add_dataset();
            }
            for v in parse_values(&read_input(Some(path))?) {
                datasets.add_value(v);
            }
            names.push(path.display().to_string());
        }
    }

    let display = format::current();
    let summaries = names
        .into_iter()
        .enumerate()
        .filter_map(|(i, name)| datasets.summary(i).map(|summary| (name, summary)));

    match output {
        OutputFormat::Text => {
            for (name, summary) in summaries {
                print!("{}", render_summary(&name, &summary, &display));
            }
        }
        OutputFormat::Json => {
            let mut report = JsonSampleReport::new();
            for (name, summary) in summaries {
                report.add_dataset(name, summary);
            }
            println!("{}", report.to_json()?);
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            bail!("Standard-error summaries support --output text or json")
        }
    }
    Ok(())
}

fn run_config(action: ConfigAction, path: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            match &path {
                Some(path) => println!("# {}", path.display()),
                None => println!("# no config location"),
            }
            print!("{}", config::to_toml(&format::current())?);
        }
        ConfigAction::Set => {
            let Some(path) = path else {
                bail!("No config location; pass --config PATH or set ${}", config::CONFIG_ENV);
            };
            let display = format::current();
            config::save(&path, &display)?;
            println!("Saved display: {} {} to {}", display.mode, display.digits, path.display());
        }
    }
    Ok(())
}

fn run_session(config_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        println!(
            "lsqcalc {}. Type 'help' for commands, 'quit' to exit.",
            env!("CARGO_PKG_VERSION")
        );
    }
    let mut repl = Repl::new(config_path);
    repl.run(stdin.lock(), std::io::stdout(), interactive)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config_path = config::resolve_path(args.config.as_deref());
    let display = with_overrides(load_display(config_path.as_deref()), &args);
    format::install(display);

    match args.command {
        Some(Command::Fit { file, output }) => run_fit(file, output),
        Some(Command::Stats(stats)) => run_stats(stats),
        Some(Command::Se { files, output }) => run_se(files, output),
        Some(Command::Config { action }) => run_config(action, config_path),
        Some(Command::Session) | None => run_session(config_path),
    }
}
