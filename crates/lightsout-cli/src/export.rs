//! Report rendering: text summary table, JSON and CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::experiment::{ExperimentReport, StrategyStats, TrialRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

pub const CSV_HEADER: &str = "trial,strategy,size,board,status,moves,expanded,elapsed_ms";

/// Write `report` to `output`, or stdout when no path is given.
pub fn export(report: &ExperimentReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&mut writer, report, format)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_report(&mut writer, report, format)?;
        }
    }
    Ok(())
}

pub fn write_report<W: Write>(
    writer: &mut W,
    report: &ExperimentReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(writer, report),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, report)?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(writer, &report.records),
    }
}

fn write_text<W: Write>(writer: &mut W, report: &ExperimentReport) -> Result<()> {
    writeln!(
        writer,
        "{} trials on {}x{} boards{}",
        report.trials,
        report.size,
        report.size,
        report
            .seed
            .map(|s| format!(" (seed {})", s))
            .unwrap_or_default()
    )?;
    writeln!(
        writer,
        "{:<8} {:>6} {:>6} {:>7} {:>5} {:>5} {:>8} {:>10}",
        "strategy", "trials", "solved", "rate", "min", "max", "mean", "avg ms"
    )?;
    for stats in &report.summary {
        write_stats_row(writer, stats)?;
    }
    Ok(())
}

fn write_stats_row<W: Write>(writer: &mut W, stats: &StrategyStats) -> Result<()> {
    let opt = |v: Option<usize>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    writeln!(
        writer,
        "{:<8} {:>6} {:>6} {:>6.1}% {:>5} {:>5} {:>8} {:>10.3}",
        stats.strategy.name(),
        stats.trials,
        stats.solved,
        stats.solve_rate(),
        opt(stats.min_moves),
        opt(stats.max_moves),
        stats
            .mean_moves()
            .map_or_else(|| "-".to_string(), |m| format!("{:.2}", m)),
        stats.mean_elapsed_ms(),
    )?;
    Ok(())
}

/// One row per record; `moves` is empty for unsolved runs.
pub fn write_csv<W: Write>(writer: &mut W, records: &[TrialRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{:.3}",
            record.trial,
            record.strategy.name(),
            record.size,
            record.board.to_compact_string(),
            record.outcome.label(),
            record.outcome.moves().map(|m| m.to_string()).unwrap_or_default(),
            record.expanded,
            record.elapsed_ms,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightsout_core::{GridState, SearchOutcome, Strategy};

    fn sample_report() -> ExperimentReport {
        let board: GridState = "11/10".parse().unwrap();
        let records = vec![
            TrialRecord {
                trial: 0,
                strategy: Strategy::Greedy,
                size: 2,
                board,
                outcome: SearchOutcome::Solved { moves: 1 },
                expanded: 1,
                generated: 4,
                elapsed_ms: 0.25,
            },
            TrialRecord {
                trial: 0,
                strategy: Strategy::AStar,
                size: 2,
                board,
                outcome: SearchOutcome::Exhausted,
                expanded: 16,
                generated: 64,
                elapsed_ms: 1.5,
            },
        ];
        let mut summary = vec![
            StrategyStats::new(Strategy::Greedy),
            StrategyStats::new(Strategy::AStar),
        ];
        summary[0].record(&records[0]);
        summary[1].record(&records[1]);

        ExperimentReport {
            size: 2,
            trials: 1,
            seed: Some(3),
            records,
            summary,
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, &sample_report(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_rows() {
        let csv = render(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "0,greedy,2,11/10,solved,1,1,0.250");
        assert_eq!(lines[2], "0,astar,2,11/10,exhausted,,16,1.500");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_has_records_and_summary() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["seed"], 3);
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["records"][0]["strategy"], "greedy");
        assert_eq!(value["records"][0]["outcome"]["status"], "solved");
        assert_eq!(value["records"][0]["board"], serde_json::json!([[1, 1], [1, 0]]));
        assert_eq!(value["summary"][1]["strategy"], "astar");
        assert_eq!(value["summary"][1]["exhausted"], 1);
    }

    #[test]
    fn test_text_table() {
        let text = render(OutputFormat::Text);
        assert!(text.starts_with("1 trials on 2x2 boards (seed 3)"));
        assert!(text.contains("greedy"));
        assert!(text.contains("100.0%"));
        assert!(text.lines().any(|l| l.starts_with("astar") && l.contains("0.0%")));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        export(&sample_report(), OutputFormat::Csv, Some(&path)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
    }
}
