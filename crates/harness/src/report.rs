//! Text tables and CSV files for trial sets and aggregates

use crate::{
    aggregate::Aggregates,
    trial::{Trial, TrialSet},
};
use eyre::WrapErr;
use std::{borrow::Cow, fmt::Display, fs, path::Path};
use tracing::info;

/// Placeholder for the numeric fields of a failed trial
pub const ERROR_PLACEHOLDER: &str = "Error";
/// Placeholder for the identifier of a failed trial
pub const FAILED_PLACEHOLDER: &str = "Failed";
/// Placeholder for the confirmation handle of a failed trial
pub const MISSING_PLACEHOLDER: &str = "N/A";

const TARGET_HEADER: &str = "Bundler";
const DETAIL_HEADERS: [&str; 5] = [
    "UserOp Hash",
    "Submission Latency (ms)",
    "On-Chain Latency (ms)",
    "Total Latency (ms)",
    "Tx Hash",
];
const SUMMARY_HEADERS: [&str; 4] = [
    TARGET_HEADER,
    "Avg Submission Latency (ms)",
    "Avg On-Chain Latency (ms)",
    "Avg Total Latency (ms)",
];

/// Layout of the detail rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailLayout {
    /// One target, no target column
    SingleTarget,
    /// Rows are prefixed with the target name
    MultiTarget,
}

/// Fields of one detail row, placeholders already applied
fn detail_fields<H, C>(trial: &Trial<H, C>) -> [String; 5]
where
    H: Display,
    C: Display,
{
    match trial.record() {
        Some(record) => [
            record.id.to_string(),
            record.submission_latency_ms.to_string(),
            record.on_chain_latency_ms().to_string(),
            record.total_latency_ms.to_string(),
            record.confirmation.to_string(),
        ],
        None => [
            FAILED_PLACEHOLDER.to_string(),
            ERROR_PLACEHOLDER.to_string(),
            ERROR_PLACEHOLDER.to_string(),
            ERROR_PLACEHOLDER.to_string(),
            MISSING_PLACEHOLDER.to_string(),
        ],
    }
}

fn detail_rows<H, C>(sets: &[TrialSet<H, C>], layout: DetailLayout) -> Vec<Vec<String>>
where
    H: Display,
    C: Display,
{
    sets.iter()
        .flat_map(|set| {
            set.trials.iter().map(move |trial| {
                let mut row = Vec::with_capacity(DETAIL_HEADERS.len() + 1);
                if layout == DetailLayout::MultiTarget {
                    row.push(set.target.clone());
                }
                row.extend(detail_fields(trial));
                row
            })
        })
        .collect()
}

fn detail_headers(layout: DetailLayout) -> Vec<&'static str> {
    match layout {
        DetailLayout::SingleTarget => DETAIL_HEADERS.to_vec(),
        DetailLayout::MultiTarget => {
            std::iter::once(TARGET_HEADER).chain(DETAIL_HEADERS).collect()
        }
    }
}

fn summary_rows(aggregates: &Aggregates) -> Vec<Vec<String>> {
    aggregates
        .iter()
        .map(|(target, result)| {
            vec![
                target.to_string(),
                result.submission_latency_ms.to_string(),
                result.on_chain_latency_ms.to_string(),
                result.total_latency_ms.to_string(),
            ]
        })
        .collect()
}

/// Quotes a field if it contains a delimiter, quote or line break
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    out.push_str(&headers.iter().map(|h| csv_field(h)).collect::<Vec<_>>().join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&row.iter().map(|f| csv_field(f)).collect::<Vec<_>>().join(","));
        out.push('\n');
    }
    out
}

/// Detail CSV: one row per trial, header always present
pub fn detail_csv<H, C>(sets: &[TrialSet<H, C>], layout: DetailLayout) -> String
where
    H: Display,
    C: Display,
{
    to_csv(&detail_headers(layout), &detail_rows(sets, layout))
}

/// Summary CSV: one row per target with at least one successful trial
pub fn summary_csv(aggregates: &Aggregates) -> String {
    to_csv(&SUMMARY_HEADERS, &summary_rows(aggregates))
}

fn write_file(path: &Path, content: &str) -> eyre::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create output directory {}", dir.display()))?;
    }
    fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

/// Writes the detail CSV, creating the parent directory if needed
pub fn write_detail_csv<H, C>(
    path: &Path,
    sets: &[TrialSet<H, C>],
    layout: DetailLayout,
) -> eyre::Result<()>
where
    H: Display,
    C: Display,
{
    write_file(path, &detail_csv(sets, layout))?;
    info!("Results saved to {}", path.display());
    Ok(())
}

/// Writes the summary CSV, creating the parent directory if needed
pub fn write_summary_csv(path: &Path, aggregates: &Aggregates) -> eyre::Result<()> {
    write_file(path, &summary_csv(aggregates))?;
    info!("Average results saved to {}", path.display());
    Ok(())
}

fn table_line<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells = fields
        .zip(widths)
        .map(|(field, &width)| format!(" {field:<width$} "))
        .collect::<Vec<_>>();
    format!("|{}|\n", cells.join("|"))
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.len()).collect::<Vec<_>>();
    for row in rows {
        for (width, field) in widths.iter_mut().zip(row) {
            *width = (*width).max(field.len());
        }
    }

    let mut out = table_line(headers.iter().copied(), &widths);
    out.push_str(&format!(
        "|{}|\n",
        widths.iter().map(|width| "-".repeat(width + 2)).collect::<Vec<_>>().join("|")
    ));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

/// Human-readable table of all trials, failed trials shown with placeholders
pub fn trials_table<H, C>(sets: &[TrialSet<H, C>], layout: DetailLayout) -> String
where
    H: Display,
    C: Display,
{
    let mut headers = vec!["#"];
    headers.extend(detail_headers(layout));

    let rows = detail_rows(sets, layout)
        .into_iter()
        .enumerate()
        .map(|(n, row)| std::iter::once((n + 1).to_string()).chain(row).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    render_table(&headers, &rows)
}

/// Human-readable table of the aggregates, one row per target
pub fn summary_table(aggregates: &Aggregates) -> String {
    let rows = aggregates
        .iter()
        .map(|(target, result)| {
            vec![
                target.to_string(),
                format!("{:.2}", result.submission_latency_ms),
                format!("{:.2}", result.on_chain_latency_ms),
                format!("{:.2}", result.total_latency_ms),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&SUMMARY_HEADERS, &rows)
}
