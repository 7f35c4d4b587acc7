//! Output formatting for routes and distance reports.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use starnav_lib::{
    DistanceReport, DistanceToFrom, RouteRenderMode, RouteStep, RouteSummary,
};

use crate::terminal::{format_light_years, supports_unicode, ColorPalette};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tagged, optionally coloured listing.
    #[default]
    Text,
    /// Markdown.
    Rich,
    /// Single line for notes.
    Note,
    Json,
}

/// Renderer for the default text format with coloured STRT/JUMP/GOAL tags.
pub struct RouteRenderer {
    palette: ColorPalette,
    unicode: bool,
}

impl RouteRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette, unicode: bool) -> Self {
        Self { palette, unicode }
    }

    /// Renderer configured from the environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(ColorPalette::detect(), supports_unicode())
    }

    /// Lines for one route, header first.
    pub fn lines(&self, summary: &RouteSummary) -> Vec<String> {
        let p = &self.palette;
        let mut lines = Vec::with_capacity(summary.steps.len() + 3);
        lines.push(format!(
            "{} from {}{}{} to {}{}{} ({} jumps):",
            summary.kind.label(),
            p.white_bold,
            summary.start.name,
            p.reset,
            p.white_bold,
            summary.goal.name,
            p.reset,
            summary.hops
        ));

        let last = summary.steps.len().saturating_sub(1);
        for (i, step) in summary.steps.iter().enumerate() {
            lines.push(self.step_line(step, i == 0, i == last));
        }

        lines.push(String::new());
        lines.push(format!(
            "{}Total distance: {}{}",
            p.cyan,
            format_light_years(summary.total_distance),
            p.reset
        ));
        lines
    }

    fn step_line(&self, step: &RouteStep, is_first: bool, is_last: bool) -> String {
        let p = &self.palette;
        let (tag_color, tag) = if is_first {
            (p.tag_start, "STRT")
        } else if is_last {
            (p.tag_goal, "GOAL")
        } else {
            (p.tag_jump, "JUMP")
        };
        let branch = match (self.unicode, is_last) {
            (true, true) => "└─",
            (true, false) => "├─",
            (false, true) => "`-",
            (false, false) => "|-",
        };

        let mut line = format!(
            "{}{}{} {}{}{} {}{}{} {}({}){}",
            p.gray, branch, p.reset, tag_color, tag, p.reset, p.white_bold, step.name, p.reset,
            p.gray, step.id, p.reset
        );
        if !is_first {
            line.push_str(&format!(
                " {}+{}{}",
                p.green,
                format_light_years(step.jump),
                p.reset
            ));
        }
        line
    }
}

/// Print routes in the requested format.
pub fn print_routes(summaries: &[RouteSummary], format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => write_json(&mut out, &summaries)?,
        OutputFormat::Text => {
            let renderer = RouteRenderer::detect();
            for (i, summary) in summaries.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                for line in renderer.lines(summary) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        OutputFormat::Rich | OutputFormat::Note => {
            let mode = if format == OutputFormat::Rich {
                RouteRenderMode::RichText
            } else {
                RouteRenderMode::Note
            };
            for summary in summaries {
                write!(out, "{}", summary.render(mode))?;
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct DistanceOutput<'a> {
    reference: Option<&'a str>,
    entries: &'a [DistanceToFrom],
}

/// Print a distance report, closest first.
pub fn print_distances(
    report: &DistanceReport,
    entries: &[DistanceToFrom],
    format: OutputFormat,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => write_json(
            &mut out,
            &DistanceOutput {
                reference: report.reference(),
                entries,
            },
        )?,
        OutputFormat::Note => {
            for entry in entries {
                writeln!(out, "{entry}")?;
            }
        }
        OutputFormat::Text | OutputFormat::Rich => {
            let p = ColorPalette::detect();
            if let Some(first) = entries.first() {
                writeln!(out, "Distances from {}{}{}:", p.white_bold, first.from_name, p.reset)?;
            }
            for (rank, entry) in entries.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {:<24} {}{:>14}{}",
                    rank + 1,
                    entry.to_name,
                    p.green,
                    format_light_years(entry.distance),
                    p.reset
                )?;
            }
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialise output")?;
    writeln!(out)?;
    Ok(())
}

/// Print elapsed time to stderr so piped output stays clean.
pub fn print_footer(elapsed: std::time::Duration) {
    let p = ColorPalette::detect();
    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{elapsed_ms}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };
    eprintln!("{}Completed in {}{}", p.gray, time_str, p.reset);
}
