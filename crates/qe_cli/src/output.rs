//! Report rendering: boxed tables for terminals, JSON for pipelines.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::Result;

/// Output format for command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Common header of every report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportHeader {
    pub generated_at: DateTime<Utc>,
    pub tool_version: &'static str,
}

impl ReportHeader {
    pub fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: crate::VERSION,
        }
    }

    /// `Generated 2026-01-02 03:04:05 UTC by qe-risk 0.1.0`
    pub fn banner(&self) -> String {
        format!(
            "Generated {} by qe-risk {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.tool_version
        )
    }
}

/// Pretty-printed JSON.
pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Box-drawn table with left-aligned headers and right-aligned cells.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = |left: &str, mid: &str, right: &str| {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, inner.join(mid), right)
    };

    let mut out = rule("┌", "┬", "┐");
    let cells: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!(" {:<w$} ", h, w = w))
        .collect();
    out.push_str(&format!("│{}│\n", cells.join("│")));
    out.push_str(&rule("├", "┼", "┤"));

    if rows.is_empty() {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = if i == 0 { "(no data)" } else { "" };
                format!(" {:<w$} ", text, w = w)
            })
            .collect();
        out.push_str(&format!("│{}│\n", cells.join("│")));
    }
    for row in rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let text = row.get(i).map(String::as_str).unwrap_or("");
                format!(" {:>w$} ", text, w = w)
            })
            .collect();
        out.push_str(&format!("│{}│\n", cells.join("│")));
    }
    out.push_str(&rule("└", "┴", "┘"));
    out
}

/// Fixed six-decimal formatting used in every table.
pub fn num(value: f64) -> String {
    format!("{:.6}", value)
}
