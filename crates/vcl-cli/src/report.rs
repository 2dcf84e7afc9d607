use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use vcl_ledger::ElectionSummary;

/// Plain-text results report written when the election closes.
pub fn render(summary: &ElectionSummary, at: NaiveDateTime) -> String {
    let winner = match &summary.winner {
        Some(winner) => format!("Winner: {} ({} votes)", winner.candidate, winner.votes),
        None => "Winner: none".to_string(),
    };
    let mut lines = vec![
        "Election Results".to_string(),
        "----------------".to_string(),
        format!("Date: {}", at.format("%Y-%m-%d %H:%M:%S")),
        format!("Total Votes Cast: {}", summary.total),
        winner,
        String::new(),
        "Vote Distribution:".to_string(),
    ];
    lines.extend(
        summary
            .tally
            .iter()
            .map(|(candidate, votes)| format!("{candidate}: {votes} votes")),
    );

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn file_name(at: NaiveDateTime) -> String {
    format!("election_results_{}.txt", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write the report into `dir`, returning the file's path.
pub fn write(dir: &Path, summary: &ElectionSummary, at: NaiveDateTime) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(file_name(at));
    fs::write(&path, render(summary, at))
        .with_context(|| format!("writing report {}", path.display()))?;
    tracing::info!(path = %path.display(), "results report written");
    Ok(path)
}
