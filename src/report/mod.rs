//! Standalone printable report.
//!
//! The report is a self-contained HTML page with its own stylesheet and an
//! inline SVG chart. It asks the browser to print itself once loaded.

use std::{
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    process::Command,
};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::compute::EmissionResult;
use crate::errors::{QuizError, Result};
use crate::render::{format_count, format_money, PieChart};

const MAX_NAME_ATTEMPTS: u32 = 100;

pub const ATTRIBUTION: &str = "Generated automatically by Carbon Quiz · Carbon credit calculator";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; background: #f5f5f5; padding: 20px; color: #1b5e20; }
h1, h2 { text-align: center; color: #2e7d32; }
.box { background: white; padding: 15px; border-radius: 10px; box-shadow: 0 2px 5px rgba(0,0,0,0.2); margin-bottom: 15px; }
.chart { display: flex; justify-content: center; }
ul { list-style: none; padding: 0; }
li { margin: 5px 0; }
.swatch { display: inline-block; width: 12px; height: 12px; border-radius: 3px; margin-right: 6px; }
.footer { text-align: center; margin-top: 30px; font-size: 14px; color: gray; }
@media print { body { background: white; } .box { box-shadow: none; } }";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub currency_symbol: String,
    pub generated_at: DateTime<Local>,
}

impl ReportOptions {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            generated_at: Local::now(),
        }
    }
}

/// Renders the printable report for a computed result.
pub fn render_report(result: &EmissionResult, options: &ReportOptions) -> String {
    let chart = PieChart::from_amounts(&result.categories);
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Emissions Report - Carbon Credit</title>\n");
    let _ = writeln!(html, "<style>\n{STYLE}\n</style>");
    html.push_str("<script>window.addEventListener('load', function () { window.print(); });</script>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>🌍 Carbon Emissions Report</h1>\n");

    html.push_str("<div class=\"box\">\n<h2>Summary</h2>\n");
    let _ = writeln!(
        html,
        "<p><b>Total emissions:</b> {} tonnes of CO₂e/year</p>",
        result.total_tonnes
    );
    let _ = writeln!(
        html,
        "<p><b>Trees needed:</b> {}</p>",
        format_count(result.trees)
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"box\">\n<h2>Emission Breakdown</h2>\n");
    if !chart.is_empty() {
        let _ = writeln!(html, "<div class=\"chart\">{}</div>", chart.to_svg());
    }
    html.push_str("<ul>\n");
    for (category, kg) in result.categories.iter() {
        let swatch = chart
            .slices()
            .iter()
            .find(|slice| slice.label == category)
            .map(|slice| {
                format!(
                    "<span class=\"swatch\" style=\"background:{}\"></span>",
                    slice.color
                )
            })
            .unwrap_or_default();
        let share = chart
            .slices()
            .iter()
            .find(|slice| slice.label == category)
            .map(|slice| format!(" ({:.1}%)", slice.percentage()))
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<li>{swatch}{}: {kg:.1} kg CO₂e{share}</li>",
            escape_html(category)
        );
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("<div class=\"box\">\n<h2>Compensation Costs</h2>\n<ul>\n");
    for (provider, price) in result.compensation.iter() {
        let _ = writeln!(
            html,
            "<li>{}: {}</li>",
            escape_html(provider),
            escape_html(&format_money(&options.currency_symbol, price))
        );
    }
    html.push_str("</ul>\n</div>\n");

    let _ = writeln!(
        html,
        "<p class=\"footer\">{ATTRIBUTION} · {}</p>",
        options.generated_at.format("%Y-%m-%d %H:%M")
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Writes reports to a directory and optionally opens them in the browser.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
    open_after_write: bool,
}

impl ReportWriter {
    pub fn new(dir: PathBuf, open_after_write: bool) -> Self {
        Self {
            dir,
            open_after_write,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Renders and stores the report, returning its path.
    pub fn write(&self, result: &EmissionResult, options: &ReportOptions) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| QuizError::Report(format!("{}: {err}", self.dir.display())))?;
        let stem = format!(
            "carbon-report-{}",
            options.generated_at.format("%Y%m%d-%H%M%S")
        );
        let html = render_report(result, options);

        let (path, mut file) = create_unique(&self.dir, &stem)
            .map_err(|err| QuizError::Report(format!("{}: {err}", self.dir.display())))?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        info!(path = %path.display(), "report written");

        if self.open_after_write {
            if let Err(err) = open_in_browser(&path) {
                warn!(error = %err, "could not open report");
            }
        }
        Ok(path)
    }
}

/// Opens `<stem>.html`, or `<stem>-2.html` and so on when the name is taken.
/// Existing reports are never overwritten.
fn create_unique(dir: &Path, stem: &str) -> io::Result<(PathBuf, File)> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let name = if attempt == 1 {
            format!("{stem}.html")
        } else {
            format!("{stem}-{attempt}.html")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("too many reports named {stem}"),
    ))
}

/// Hands the file to the platform's default opener without waiting for it.
pub fn open_in_browser(path: &Path) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };
    command.arg(path).spawn().map(|_| ())
}
