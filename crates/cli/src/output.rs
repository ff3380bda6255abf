//! Files and tables written by the CLI.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use kelly_mc_domain::{BetModel, CiMetric, MetricsResult, SampledPaths, SimulationConfig};
use kelly_mc_simulation::experiment::{ExperimentOptions, ExperimentResult, PolicyRun};
use kelly_mc_simulation::sensitivity::SensitivityRow;
use prettytable::{Table, format, row};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// One line of `summary.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub policy: String,
    pub n: usize,
    pub terminal_mean: f64,
    pub terminal_mean_ci_low: f64,
    pub terminal_mean_ci_high: f64,
    pub terminal_median: f64,
    pub terminal_p10: f64,
    pub terminal_p90: f64,
    pub loss_probability: f64,
    pub loss_prob_ci_low: f64,
    pub loss_prob_ci_high: f64,
    pub ruin_probability: f64,
    pub ruin_prob_ci_low: f64,
    pub ruin_prob_ci_high: f64,
    pub mean_log_growth: f64,
    pub mean_log_growth_ci_low: f64,
    pub mean_log_growth_ci_high: f64,
    pub vol_log_growth: f64,
    pub max_drawdown_mean_sample: Option<f64>,
}

impl SummaryRow {
    /// Flattens a run's metrics and intervals into one row.
    pub fn from_run(run: &PolicyRun) -> Self {
        let m = &run.metrics;
        let ci = |metric: CiMetric| {
            m.interval(metric)
                .map_or((f64::NAN, f64::NAN), |ci| (ci.low, ci.high))
        };
        let terminal_mean_ci = ci(CiMetric::TerminalMean);
        let loss_ci = ci(CiMetric::LossProbability);
        let ruin_ci = ci(CiMetric::RuinProbability);
        let growth_ci = ci(CiMetric::MeanLogGrowth);

        Self {
            policy: run.name.clone(),
            n: m.n,
            terminal_mean: m.terminal_mean,
            terminal_mean_ci_low: terminal_mean_ci.0,
            terminal_mean_ci_high: terminal_mean_ci.1,
            terminal_median: m.terminal_median,
            terminal_p10: m.terminal_p10,
            terminal_p90: m.terminal_p90,
            loss_probability: m.loss_probability,
            loss_prob_ci_low: loss_ci.0,
            loss_prob_ci_high: loss_ci.1,
            ruin_probability: m.ruin_probability,
            ruin_prob_ci_low: ruin_ci.0,
            ruin_prob_ci_high: ruin_ci.1,
            mean_log_growth: m.mean_log_growth,
            mean_log_growth_ci_low: growth_ci.0,
            mean_log_growth_ci_high: growth_ci.1,
            vol_log_growth: m.vol_log_growth,
            max_drawdown_mean_sample: m.max_drawdown_mean,
        }
    }
}

/// Summary rows sorted by mean log growth, best first.
pub fn summary_rows(result: &ExperimentResult) -> Vec<SummaryRow> {
    let mut rows: Vec<_> = result.runs().iter().map(SummaryRow::from_run).collect();
    rows.sort_by(|a, b| b.mean_log_growth.total_cmp(&a.mean_log_growth));
    rows
}

/// JSON report written next to the CSV files.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Time the report was written.
    pub generated_at: DateTime<Utc>,
    pub model: &'a BetModel,
    pub config: &'a SimulationConfig,
    pub options: &'a ExperimentOptions,
    pub metrics: BTreeMap<&'a str, &'a MetricsResult>,
}

/// Writes every artifact of a `run` to `outdir` and returns the written paths.
pub fn write_run(
    outdir: &Path,
    model: &BetModel,
    config: &SimulationConfig,
    options: &ExperimentOptions,
    result: &ExperimentResult,
) -> Result<Vec<PathBuf>> {
    let stems = policy_file_stems(result)?;

    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory {}", outdir.display()))?;

    let mut written = Vec::new();

    let path = outdir.join("summary.csv");
    write_rows(&path, &summary_rows(result))?;
    written.push(path);

    for (run, stem) in result.runs().iter().zip(&stems) {
        let path = outdir.join(format!("terminal_{stem}.csv"));
        write_terminal(&path, &run.terminal_wealth)?;
        written.push(path);
    }
    for (run, stem) in result.runs().iter().zip(&stems) {
        let path = outdir.join(format!("paths_{stem}.csv"));
        write_paths(&path, &run.sampled_paths)?;
        written.push(path);
    }

    let report = RunReport {
        generated_at: Utc::now(),
        model,
        config,
        options,
        metrics: result.metrics_by_name(),
    };
    let path = outdir.join("summary.json");
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &report)
        .with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);

    Ok(written)
}

/// Policy name made safe for use inside a file name.
///
/// Every character outside `[A-Za-z0-9_.-]` becomes `_`, so the result never
/// contains a path separator.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File stems of every run in supply order; fails if two names share a stem.
fn policy_file_stems(result: &ExperimentResult) -> Result<Vec<String>> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut stems = Vec::with_capacity(result.len());
    for run in result.runs() {
        let stem = file_stem(&run.name);
        if let Some(other) = seen.insert(stem.clone(), &run.name) {
            bail!(
                "policies `{other}` and `{}` both map to output file name `{stem}`",
                run.name
            );
        }
        stems.push(stem);
    }
    Ok(stems)
}

/// Writes `sensitivity_summary.csv` to `outdir`.
pub fn write_sensitivity(outdir: &Path, rows: &[SensitivityRow]) -> Result<PathBuf> {
    fs::create_dir_all(outdir)
        .with_context(|| format!("failed to create output directory {}", outdir.display()))?;
    let path = outdir.join("sensitivity_summary.csv");
    write_rows(&path, rows)?;
    Ok(path)
}

fn writer(path: &Path) -> Result<csv::Writer<File>> {
    csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = writer(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_terminal(path: &Path, terminal: &[f64]) -> Result<()> {
    let mut writer = writer(path)?;
    writer.write_record(["terminal_wealth"])?;
    for w in terminal {
        writer.write_record([w.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per sampled trajectory; columns named by step `0..=rounds`.
fn write_paths(path: &Path, paths: &SampledPaths) -> Result<()> {
    let mut writer = writer(path)?;
    writer.write_record((0..paths.cols()).map(|step| step.to_string()))?;
    for row in paths.iter_rows() {
        writer.write_record(row.iter().map(|w| w.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Column title of the mean-log-growth interval, e.g. `95% CI log g`.
pub fn ci_title(confidence_level: f64) -> String {
    let pct = confidence_level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{pct:.0}% CI log g")
    } else {
        format!("{pct:.1}% CI log g")
    }
}

/// Prints the run summary; `confidence_level` labels the interval column.
pub fn print_summary(rows: &[SummaryRow], confidence_level: f64) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![
        "policy",
        "mean",
        "median",
        "p10",
        "p90",
        "P(loss)",
        "P(ruin)",
        "mean log g",
        ci_title(confidence_level),
        "max DD",
    ]);
    for r in rows {
        table.add_row(row![
            r.policy,
            format!("{:.4}", r.terminal_mean),
            format!("{:.4}", r.terminal_median),
            format!("{:.4}", r.terminal_p10),
            format!("{:.4}", r.terminal_p90),
            format!("{:.3}", r.loss_probability),
            format!("{:.3}", r.ruin_probability),
            format!("{:.4}", r.mean_log_growth),
            format!(
                "[{:.4}, {:.4}]",
                r.mean_log_growth_ci_low, r.mean_log_growth_ci_high
            ),
            r.max_drawdown_mean_sample
                .map_or_else(|| "-".to_string(), |dd| format!("{dd:.3}")),
        ]);
    }
    table.printstd();
}

/// Prints the first `limit` sensitivity rows.
pub fn print_sensitivity(rows: &[SensitivityRow], limit: usize) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![
        "p",
        "b",
        "kelly f",
        "policy",
        "mean log g",
        "P(ruin)",
        "P(loss)",
        "mean",
        "median",
    ]);
    for r in rows.iter().take(limit) {
        table.add_row(row![
            format!("{:.2}", r.p),
            format!("{:.2}", r.b),
            format!("{:.4}", r.kelly_fraction),
            r.policy,
            format!("{:.4}", r.mean_log_growth),
            format!("{:.3}", r.ruin_probability),
            format!("{:.3}", r.loss_probability),
            format!("{:.4}", r.terminal_mean),
            format!("{:.4}", r.terminal_median),
        ]);
    }
    table.printstd();
}
